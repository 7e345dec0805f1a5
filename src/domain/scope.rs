use super::BoundingBox;

/// Extra tag condition narrowing a category query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// `["key"="value"]`
    Equals(String, String),
    /// `["key"]`
    Exists(String),
}

impl TagFilter {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        TagFilter::Equals(key.into(), value.into())
    }

    pub fn exists(key: impl Into<String>) -> Self {
        TagFilter::Exists(key.into())
    }
}

/// One category query over a fixed area.
///
/// The primary filter is `[tag_key = category]` unless `primary_value`
/// overrides the value (schools query `amenity=school` and narrow by
/// `school:type=<category>` instead).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryScope {
    pub bbox: BoundingBox,
    pub category: String,
    pub tag_key: String,
    pub primary_value: Option<String>,
    pub filters: Vec<TagFilter>,
}

impl QueryScope {
    pub fn new(bbox: BoundingBox, category: impl Into<String>, tag_key: impl Into<String>) -> Self {
        Self {
            bbox,
            category: category.into(),
            tag_key: tag_key.into(),
            primary_value: None,
            filters: Vec::new(),
        }
    }

    pub fn with_primary_value(mut self, value: impl Into<String>) -> Self {
        self.primary_value = Some(value.into());
        self
    }

    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Value matched against `tag_key`
    pub fn primary_value(&self) -> &str {
        self.primary_value.as_deref().unwrap_or(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PARIS;

    #[test]
    fn test_primary_value_defaults_to_category() {
        let scope = QueryScope::new(PARIS, "restaurant", "amenity");
        assert_eq!(scope.primary_value(), "restaurant");

        let school = QueryScope::new(PARIS, "primary", "amenity")
            .with_primary_value("school")
            .with_filter(TagFilter::equals("school:type", "primary"));
        assert_eq!(school.primary_value(), "school");
        assert_eq!(school.filters.len(), 1);
    }
}
