use crate::api::Element;
use crate::config::DirectoryConfig;
use crate::domain::{Access, FeatureRecord, UNKNOWN};

/// Normalize one element of a category response.
///
/// Returns `None` when the element carries no coordinates (neither a point
/// nor a way centroid). Every other missing tag becomes `"unknown"`.
pub fn normalize_element(
    element: &Element,
    category: &str,
    directory: &DirectoryConfig,
) -> Option<FeatureRecord> {
    let (lat, lon) = element.coordinates()?;

    let name = element
        .tag("name")
        .map(str::to_string)
        .unwrap_or_else(|| directory.name_fallback.resolve(category));

    let accessibility = directory
        .accessibility_features
        .iter()
        .map(|feature| (feature.clone(), Access::from_tag(element.tag(feature))))
        .collect();

    let attributes = directory
        .attributes
        .iter()
        .map(|attr| {
            let value = element.tag(&attr.tag).unwrap_or(UNKNOWN);
            (attr.field.clone(), value.to_string())
        })
        .collect();

    Some(FeatureRecord {
        lat,
        lon,
        name,
        category: category.to_string(),
        accessibility,
        attributes,
    })
}

/// Normalize a whole response, returning the records and how many elements
/// were dropped for lacking coordinates
pub fn normalize_elements(
    elements: &[Element],
    category: &str,
    directory: &DirectoryConfig,
) -> (Vec<FeatureRecord>, usize) {
    let records: Vec<FeatureRecord> = elements
        .iter()
        .filter_map(|e| normalize_element(e, category, directory))
        .collect();
    let dropped = elements.len() - records.len();
    (records, dropped)
}
