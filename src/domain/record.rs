use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel stored for any tag the backend did not provide
pub const UNKNOWN: &str = "unknown";

/// Folded value of an accessibility tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Yes,
    No,
    Limited,
    Unknown,
}

impl Access {
    /// Fold a raw tag value.
    ///
    /// Absent tags are `Unknown`; any present value other than `yes` or
    /// `limited` (empty strings included) counts as `No`.
    pub fn from_tag(value: Option<&str>) -> Access {
        match value {
            None => Access::Unknown,
            Some("yes") => Access::Yes,
            Some("limited") => Access::Limited,
            Some(_) => Access::No,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Yes => "yes",
            Access::No => "no",
            Access::Limited => "limited",
            Access::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized point of interest
///
/// Maps are ordered so two runs over the same data serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub category: String,
    pub accessibility: BTreeMap<String, Access>,
    pub attributes: BTreeMap<String, String>,
}

impl FeatureRecord {
    pub fn access(&self, feature: &str) -> Access {
        self.accessibility
            .get(feature)
            .copied()
            .unwrap_or(Access::Unknown)
    }

    pub fn attribute(&self, field: &str) -> &str {
        self.attributes.get(field).map_or(UNKNOWN, String::as_str)
    }

    /// Value a weight rule compares against: the accessibility map wins,
    /// then the descriptive attributes
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.accessibility
            .get(key)
            .map(Access::as_str)
            .or_else(|| self.attributes.get(key).map(String::as_str))
    }
}

/// Display bucket derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Low,
    Medium,
    High,
}

impl ScoreTier {
    pub const HIGH_THRESHOLD: i32 = 4;
    pub const MEDIUM_THRESHOLD: i32 = 2;

    pub fn from_score(score: i32) -> ScoreTier {
        if score >= Self::HIGH_THRESHOLD {
            ScoreTier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }
}

/// A record with its derived score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFeatureRecord {
    #[serde(flatten)]
    pub record: FeatureRecord,
    pub score: i32,
}

impl ScoredFeatureRecord {
    pub fn new(record: FeatureRecord, score: i32) -> Self {
        Self { record, score }
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }

    /// (lat, lon, weight) triple for a density layer
    pub fn heat_point(&self) -> (f64, f64, f64) {
        (self.record.lat, self.record.lon, f64::from(self.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Access::Unknown)]
    #[case(Some("yes"), Access::Yes)]
    #[case(Some("limited"), Access::Limited)]
    #[case(Some("no"), Access::No)]
    #[case(Some("designated"), Access::No)]
    #[case(Some(""), Access::No)]
    fn test_access_from_tag(#[case] raw: Option<&str>, #[case] expected: Access) {
        assert_eq!(Access::from_tag(raw), expected);
    }

    #[rstest]
    #[case(0, ScoreTier::Low)]
    #[case(1, ScoreTier::Low)]
    #[case(2, ScoreTier::Medium)]
    #[case(3, ScoreTier::Medium)]
    #[case(4, ScoreTier::High)]
    #[case(9, ScoreTier::High)]
    fn test_tier_thresholds(#[case] score: i32, #[case] tier: ScoreTier) {
        assert_eq!(ScoreTier::from_score(score), tier);
    }

    #[test]
    fn test_value_of_prefers_accessibility() {
        let record = FeatureRecord {
            lat: 48.85,
            lon: 2.35,
            name: "Toilettes".to_string(),
            category: "toilets".to_string(),
            accessibility: BTreeMap::from([("wheelchair".to_string(), Access::Limited)]),
            attributes: BTreeMap::from([
                ("fee".to_string(), "no".to_string()),
                ("wheelchair".to_string(), "shadowed".to_string()),
            ]),
        };

        assert_eq!(record.value_of("wheelchair"), Some("limited"));
        assert_eq!(record.value_of("fee"), Some("no"));
        assert_eq!(record.value_of("braille"), None);
        assert_eq!(record.access("braille"), Access::Unknown);
        assert_eq!(record.attribute("phone"), UNKNOWN);
    }

    #[test]
    fn test_scored_record_serializes_flat() {
        let record = FeatureRecord {
            lat: 1.0,
            lon: 2.0,
            name: "Cafe".to_string(),
            category: "cafe".to_string(),
            accessibility: BTreeMap::from([("wheelchair".to_string(), Access::Yes)]),
            attributes: BTreeMap::new(),
        };
        let scored = ScoredFeatureRecord::new(record, 2);
        let json = serde_json::to_value(&scored).unwrap();

        assert_eq!(json["score"], 2);
        assert_eq!(json["name"], "Cafe");
        assert_eq!(json["accessibility"]["wheelchair"], "yes");
        assert_eq!(scored.heat_point(), (1.0, 2.0, 2.0));
        assert_eq!(scored.tier(), ScoreTier::Medium);
    }
}
