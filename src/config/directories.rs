//! Compiled-in directory presets.
//!
//! A directory is one themed map: which categories to query under which tag
//! key, which tags to keep, and how to score the result.

use clap::ValueEnum;

use crate::domain::{BoundingBox, QueryScope, TagFilter};
use crate::score::WeightTable;

/// Display name used when an element has no `name` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFallback {
    /// `post_office` -> `Post Office`
    CategoryTitle,
    Fixed(String),
}

impl NameFallback {
    pub fn resolve(&self, category: &str) -> String {
        match self {
            NameFallback::CategoryTitle => title_case(category),
            NameFallback::Fixed(label) => label.clone(),
        }
    }
}

fn title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            word.split('-')
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Backend tag copied into a named record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeField {
    pub tag: String,
    pub field: String,
}

impl AttributeField {
    pub fn new(tag: &str, field: &str) -> Self {
        Self {
            tag: tag.to_string(),
            field: field.to_string(),
        }
    }

    /// Field named after its tag
    pub fn same(tag: &str) -> Self {
        Self::new(tag, tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub name: String,
    /// Primary tag key, e.g. `amenity`
    pub tag_key: String,
    /// Fixed value for `tag_key`; the category then goes to `category_tag`
    pub primary_value: Option<String>,
    pub category_tag: Option<String>,
    pub filters: Vec<TagFilter>,
    pub categories: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub attributes: Vec<AttributeField>,
    pub weights: WeightTable,
    pub name_fallback: NameFallback,
}

impl DirectoryConfig {
    pub fn new(name: &str, tag_key: &str, categories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tag_key: tag_key.to_string(),
            primary_value: None,
            category_tag: None,
            filters: Vec::new(),
            categories: strings(categories),
            accessibility_features: Vec::new(),
            attributes: Vec::new(),
            weights: WeightTable::new(),
            name_fallback: NameFallback::CategoryTitle,
        }
    }

    pub fn with_accessibility(mut self, features: &[&str]) -> Self {
        self.accessibility_features = strings(features);
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeField>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_name_fallback(mut self, label: &str) -> Self {
        self.name_fallback = NameFallback::Fixed(label.to_string());
        self
    }

    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Query `tag_key=value` and narrow by `category_tag=<category>`
    pub fn with_category_tag(mut self, value: &str, category_tag: &str) -> Self {
        self.primary_value = Some(value.to_string());
        self.category_tag = Some(category_tag.to_string());
        self
    }

    pub fn scope(&self, bbox: BoundingBox, category: &str) -> QueryScope {
        let mut scope = QueryScope::new(bbox, category, self.tag_key.as_str());
        if let Some(value) = &self.primary_value {
            scope = scope.with_primary_value(value.as_str());
        }
        if let Some(key) = &self.category_tag {
            scope = scope.with_filter(TagFilter::equals(key.as_str(), category));
        }
        for filter in &self.filters {
            scope = scope.with_filter(filter.clone());
        }
        scope
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `wheelchair` worth 2, every other listed feature worth 1
fn wheelchair_first(features: &[&str]) -> WeightTable {
    features.iter().fold(WeightTable::new(), |table, f| {
        let weight = if *f == "wheelchair" { 2 } else { 1 };
        table.yes(f, weight)
    })
}

const CONTACT_FIELDS: [(&str, &str); 7] = [
    ("opening_hours", "opening_hours"),
    ("phone", "phone"),
    ("website", "website"),
    ("email", "email"),
    ("addr:full", "address"),
    ("brand", "brand"),
    ("operator", "operator"),
];

fn contact_fields() -> Vec<AttributeField> {
    CONTACT_FIELDS
        .iter()
        .map(|(tag, field)| AttributeField::new(tag, field))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Directory {
    Business,
    Emergency,
    Parking,
    Charging,
    Restrooms,
    Schools,
    Safety,
    Tourist,
    Transport,
    Wheelchair,
}

impl Directory {
    pub const ALL: [Directory; 10] = [
        Directory::Business,
        Directory::Emergency,
        Directory::Parking,
        Directory::Charging,
        Directory::Restrooms,
        Directory::Schools,
        Directory::Safety,
        Directory::Tourist,
        Directory::Transport,
        Directory::Wheelchair,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Directory::Business => "business",
            Directory::Emergency => "emergency",
            Directory::Parking => "parking",
            Directory::Charging => "charging",
            Directory::Restrooms => "restrooms",
            Directory::Schools => "schools",
            Directory::Safety => "safety",
            Directory::Tourist => "tourist",
            Directory::Transport => "transport",
            Directory::Wheelchair => "wheelchair",
        }
    }

    pub fn config(&self) -> DirectoryConfig {
        match self {
            Directory::Business => {
                const FEATURES: [&str; 11] = [
                    "wheelchair",
                    "hearing_loop",
                    "braille",
                    "tactile_paving",
                    "elevator",
                    "ramp",
                    "wide_door",
                    "accessible_toilet",
                    "sign_language",
                    "audio_description",
                    "guide_dog",
                ];
                DirectoryConfig::new(
                    self.name(),
                    "amenity",
                    &[
                        "restaurant",
                        "cafe",
                        "bar",
                        "shop",
                        "supermarket",
                        "pharmacy",
                        "bank",
                        "post_office",
                        "library",
                        "cinema",
                        "theatre",
                        "museum",
                        "gallery",
                        "hotel",
                        "hospital",
                        "clinic",
                        "school",
                        "university",
                        "office",
                        "government",
                    ],
                )
                .with_accessibility(&FEATURES)
                .with_attributes(contact_fields())
                .with_weights(wheelchair_first(&FEATURES))
            }
            Directory::Emergency => {
                const FEATURES: [&str; 13] = [
                    "wheelchair",
                    "hearing_loop",
                    "braille",
                    "tactile_paving",
                    "elevator",
                    "ramp",
                    "wide_door",
                    "accessible_toilet",
                    "sign_language",
                    "audio_description",
                    "guide_dog",
                    "emergency_phone",
                    "emergency_lighting",
                ];
                let mut attributes = contact_fields();
                attributes.push(AttributeField::same("emergency"));
                DirectoryConfig::new(
                    self.name(),
                    "amenity",
                    &[
                        "hospital",
                        "police",
                        "fire_station",
                        "pharmacy",
                        "emergency_ward",
                        "ambulance_station",
                        "emergency_phone",
                    ],
                )
                .with_accessibility(&FEATURES)
                .with_attributes(attributes)
                .with_weights(wheelchair_first(&FEATURES))
            }
            Directory::Parking => DirectoryConfig::new(
                self.name(),
                "amenity",
                &[
                    "parking",
                    "parking_space",
                    "parking_entrance",
                    "parking_lane",
                    "parking_multi-storey",
                ],
            )
            .with_accessibility(&["wheelchair", "disabled"])
            .with_attributes(
                ["fee", "access", "opening_hours", "capacity", "maxstay", "operator"]
                    .into_iter()
                    .map(AttributeField::same)
                    .collect(),
            )
            .with_weights(WeightTable::new().yes("wheelchair", 2).yes("disabled", 1)),
            Directory::Charging => DirectoryConfig::new(
                self.name(),
                "amenity",
                &["charging_station", "ev_charging", "ev_charging_station"],
            )
            .with_attributes(
                ["operator", "socket", "voltage", "current", "fee"]
                    .into_iter()
                    .map(AttributeField::same)
                    .collect(),
            ),
            Directory::Restrooms => {
                DirectoryConfig::new(self.name(), "amenity", &["toilets", "wc", "restroom"])
                    .with_accessibility(&["wheelchair", "baby_change", "drinking_water"])
                    .with_attributes(
                        ["fee", "access", "opening_hours"]
                            .into_iter()
                            .map(AttributeField::same)
                            .collect(),
                    )
                    .with_weights(
                        WeightTable::new()
                            .yes("wheelchair", 2)
                            .yes("baby_change", 1)
                            .yes("drinking_water", 1)
                            .when("fee", "no", 1)
                            .when("access", "public", 1),
                    )
                    .with_name_fallback("Public Restroom")
            }
            Directory::Schools => DirectoryConfig::new(
                self.name(),
                "amenity",
                &["primary", "secondary", "kindergarten", "university"],
            )
            .with_category_tag("school", "school:type")
            .with_accessibility(&["wheelchair"])
            .with_attributes(
                ["opening_hours", "website", "description", "capacity"]
                    .into_iter()
                    .map(AttributeField::same)
                    .collect(),
            )
            .with_weights(WeightTable::new().yes("wheelchair", 2))
            .with_name_fallback("School"),
            Directory::Safety => DirectoryConfig::new(
                self.name(),
                "amenity",
                &[
                    "crossing",
                    "traffic_signals",
                    "crossing_guard",
                    "school_zone",
                    "speed_bump",
                    "pedestrian_zone",
                    "footway",
                ],
            )
            .with_attributes(vec![AttributeField::same("description")]),
            Directory::Tourist => DirectoryConfig::new(
                self.name(),
                "tourism",
                &[
                    "museum",
                    "gallery",
                    "monument",
                    "memorial",
                    "castle",
                    "historic",
                    "tourism",
                    "viewpoint",
                    "artwork",
                ],
            )
            .with_accessibility(&["wheelchair", "audio_guide", "sign_language", "braille"])
            .with_attributes(
                [
                    "opening_hours",
                    "fee",
                    "website",
                    "description",
                    "historic",
                    "wikipedia",
                ]
                .into_iter()
                .map(AttributeField::same)
                .collect(),
            )
            .with_weights(
                WeightTable::new()
                    .yes("wheelchair", 2)
                    .yes("audio_guide", 1)
                    .yes("sign_language", 1)
                    .yes("braille", 1),
            )
            .with_name_fallback("Tourist Attraction"),
            Directory::Transport => {
                const FEATURES: [&str; 16] = [
                    "wheelchair",
                    "elevator",
                    "escalator",
                    "lift",
                    "tactile_paving",
                    "braille",
                    "audio_announcements",
                    "visual_announcements",
                    "wide_door",
                    "ramp",
                    "accessible_toilet",
                    "guide_dog",
                    "step_free_access",
                    "level_access",
                    "platform_height",
                    "platform_slope",
                ];
                DirectoryConfig::new(
                    self.name(),
                    "public_transport",
                    &[
                        "subway_entrance",
                        "subway_station",
                        "bus_station",
                        "bus_stop",
                        "train_station",
                        "railway_station",
                        "station",
                        "platform",
                    ],
                )
                .with_accessibility(&FEATURES)
                .with_attributes(vec![
                    AttributeField::same("opening_hours"),
                    AttributeField::same("operator"),
                    AttributeField::same("network"),
                    AttributeField::same("ref"),
                    AttributeField::same("lines"),
                    AttributeField::same("routes"),
                    AttributeField::new("station", "station_type"),
                    AttributeField::new("platform:level", "platform_level"),
                ])
                .with_weights(wheelchair_first(&FEATURES))
            }
            Directory::Wheelchair => DirectoryConfig::new(
                self.name(),
                "amenity",
                &[
                    "restaurant",
                    "cafe",
                    "museum",
                    "shop",
                    "bank",
                    "pharmacy",
                    "hospital",
                ],
            )
            .with_filter(TagFilter::exists("wheelchair"))
            .with_accessibility(&["wheelchair"])
            .with_weights(
                WeightTable::new()
                    .yes("wheelchair", 2)
                    .when("wheelchair", "limited", 1),
            )
            .with_name_fallback("Unnamed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PARIS;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("post_office"), "Post Office");
        assert_eq!(title_case("restaurant"), "Restaurant");
        assert_eq!(title_case("parking_multi-storey"), "Parking Multi-Storey");
    }

    #[test]
    fn test_every_directory_is_usable() {
        for directory in Directory::ALL {
            let config = directory.config();
            assert_eq!(config.name, directory.name());
            assert!(!config.categories.is_empty(), "{} has no categories", config.name);
            for rule in config.weights.rules() {
                let known = config.accessibility_features.contains(&rule.feature)
                    || config.attributes.iter().any(|a| a.field == rule.feature);
                assert!(known, "{}: rule on untracked {}", config.name, rule.feature);
            }
        }
    }

    #[test]
    fn test_school_scope_narrows_by_type() {
        let scope = Directory::Schools.config().scope(PARIS, "kindergarten");
        assert_eq!(scope.tag_key, "amenity");
        assert_eq!(scope.primary_value(), "school");
        assert_eq!(
            scope.filters,
            vec![TagFilter::equals("school:type", "kindergarten")]
        );
    }

    #[test]
    fn test_tourist_weights() {
        let config = Directory::Tourist.config();
        assert_eq!(config.tag_key, "tourism");
        let weights: Vec<(&str, i32)> = config
            .weights
            .rules()
            .iter()
            .map(|r| (r.feature.as_str(), r.weight))
            .collect();
        assert_eq!(
            weights,
            vec![
                ("wheelchair", 2),
                ("audio_guide", 1),
                ("sign_language", 1),
                ("braille", 1)
            ]
        );
    }

    #[test]
    fn test_wheelchair_scope_requires_tag() {
        let scope = Directory::Wheelchair.config().scope(PARIS, "cafe");
        assert_eq!(scope.primary_value(), "cafe");
        assert_eq!(scope.filters, vec![TagFilter::exists("wheelchair")]);
    }
}
