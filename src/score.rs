//! Weighted accessibility scoring.
//!
//! A score is the sum of the weights of every rule whose feature carries the
//! expected value. Rules usually expect `yes`; a few directories reward other
//! values (`fee=no`, `access=public`). Scores are not normalized, so they are
//! only comparable between records scored with the same table.

use crate::domain::{FeatureRecord, ScoredFeatureRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightRule {
    pub feature: String,
    pub expected: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    rules: Vec<WeightRule>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` when `feature` is `yes`
    pub fn yes(self, feature: &str, weight: i32) -> Self {
        self.when(feature, "yes", weight)
    }

    /// Add `weight` when `feature` equals `expected`
    pub fn when(mut self, feature: &str, expected: &str, weight: i32) -> Self {
        self.rules.push(WeightRule {
            feature: feature.to_string(),
            expected: expected.to_string(),
            weight,
        });
        self
    }

    pub fn rules(&self) -> &[WeightRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn score(&self, record: &FeatureRecord) -> i32 {
        self.rules
            .iter()
            .filter(|rule| record.value_of(&rule.feature) == Some(rule.expected.as_str()))
            .map(|rule| rule.weight)
            .sum()
    }

    pub fn apply(&self, record: FeatureRecord) -> ScoredFeatureRecord {
        let score = self.score(&record);
        ScoredFeatureRecord::new(record, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Access, ScoreTier};
    use std::collections::BTreeMap;

    fn record(access: &[(&str, Access)], attributes: &[(&str, &str)]) -> FeatureRecord {
        FeatureRecord {
            lat: 48.86,
            lon: 2.34,
            name: "Musée".to_string(),
            category: "museum".to_string(),
            accessibility: access
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn tourist_table() -> WeightTable {
        WeightTable::new()
            .yes("wheelchair", 2)
            .yes("audio_guide", 1)
            .yes("sign_language", 1)
            .yes("braille", 1)
    }

    #[test]
    fn test_wheelchair_and_audio_guide_score_three() {
        let r = record(
            &[
                ("wheelchair", Access::Yes),
                ("audio_guide", Access::Yes),
                ("sign_language", Access::Unknown),
                ("braille", Access::Unknown),
            ],
            &[],
        );
        assert_eq!(tourist_table().score(&r), 3);
    }

    #[test]
    fn test_all_unknown_scores_zero() {
        let r = record(
            &[
                ("wheelchair", Access::Unknown),
                ("audio_guide", Access::Unknown),
                ("sign_language", Access::Unknown),
                ("braille", Access::Unknown),
            ],
            &[],
        );
        assert_eq!(tourist_table().score(&r), 0);
    }

    #[test]
    fn test_non_yes_values_contribute_nothing() {
        let r = record(
            &[
                ("wheelchair", Access::Limited),
                ("audio_guide", Access::No),
            ],
            &[],
        );
        assert_eq!(tourist_table().score(&r), 0);
    }

    #[test]
    fn test_expected_values_match_attributes() {
        let table = WeightTable::new()
            .yes("wheelchair", 2)
            .yes("baby_change", 1)
            .yes("drinking_water", 1)
            .when("fee", "no", 1)
            .when("access", "public", 1);
        let r = record(
            &[
                ("wheelchair", Access::Yes),
                ("baby_change", Access::Yes),
                ("drinking_water", Access::No),
            ],
            &[("fee", "no"), ("access", "public")],
        );

        let scored = table.apply(r);
        assert_eq!(scored.score, 5);
        assert_eq!(scored.tier(), ScoreTier::High);
    }

    #[test]
    fn test_limited_rule() {
        let table = WeightTable::new()
            .yes("wheelchair", 2)
            .when("wheelchair", "limited", 1);
        assert_eq!(table.score(&record(&[("wheelchair", Access::Limited)], &[])), 1);
        assert_eq!(table.score(&record(&[("wheelchair", Access::Yes)], &[])), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = WeightTable::new();
        assert!(table.is_empty());
        assert_eq!(table.score(&record(&[("wheelchair", Access::Yes)], &[])), 0);
    }
}
