//! Vocabulary-to-vocabulary mappings.
//!
//! A crosswalk matches every label of one vocabulary (typically the standard
//! fine-grained brackets a user picks from) against another (a table's own
//! coarser brackets), so callers can see up front which table bin each user
//! choice lands in and which user choices share a bin.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryValue, Family};
use crate::error::Result;

use super::{MatchBasis, Matcher};

/// One source label and the target label it maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosswalkEntry {
    pub from: String,
    pub to: String,
    pub score: f64,
    pub explanation: String,
    pub basis: MatchBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crosswalk {
    pub family: Family,
    /// Target vocabulary in its original order.
    pub targets: Vec<String>,
    pub entries: Vec<CrosswalkEntry>,
}

impl Crosswalk {
    pub fn lookup(&self, from: &str) -> Option<&CrosswalkEntry> {
        self.entries.iter().find(|e| e.from == from)
    }

    /// Target label → source labels mapped onto it, in target order.
    /// Targets nothing maps onto are kept with an empty list.
    pub fn reverse(&self) -> IndexMap<String, Vec<String>> {
        let mut grouped: IndexMap<String, Vec<String>> = self
            .targets
            .iter()
            .map(|t| (t.clone(), Vec::new()))
            .collect();
        for entry in &self.entries {
            grouped
                .entry(entry.to.clone())
                .or_default()
                .push(entry.from.clone());
        }
        grouped
    }

    /// Entries scoring below `threshold`.
    pub fn weak_entries(&self, threshold: f64) -> Vec<&CrosswalkEntry> {
        self.entries.iter().filter(|e| e.score < threshold).collect()
    }
}

/// Match every label in `from` against the `to` vocabulary.
pub fn build_crosswalk<S: AsRef<str>, T: AsRef<str>>(
    matcher: &Matcher,
    family: Family,
    from: &[S],
    to: &[T],
) -> Result<Crosswalk> {
    let candidates: Vec<CategoryValue> = to
        .iter()
        .map(|t| CategoryValue::new(family, t.as_ref()))
        .collect();

    let mut entries = Vec::with_capacity(from.len());
    for label in from {
        let target = CategoryValue::new(family, label.as_ref());
        let result = matcher.match_value(&target, &candidates)?;
        entries.push(CrosswalkEntry {
            from: target.label,
            to: result.matched.label,
            score: result.score,
            explanation: result.explanation,
            basis: result.basis,
        });
    }

    Ok(Crosswalk {
        family,
        targets: candidates.into_iter().map(|c| c.label).collect(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGE_INCOME_RANGES: &[&str] = &[
        "Under 25 years",
        "25 to 44 years",
        "45 to 64 years",
        "65 years and over",
    ];

    #[test]
    fn test_standard_ages_onto_householder_brackets() {
        let walk = build_crosswalk(
            &Matcher::default(),
            Family::Age,
            Family::Age.standard_labels(),
            AGE_INCOME_RANGES,
        )
        .unwrap();

        assert_eq!(walk.entries.len(), 14);
        assert_eq!(walk.lookup("Under 5 years").unwrap().to, "Under 25 years");
        assert_eq!(walk.lookup("20 to 24 years").unwrap().to, "Under 25 years");
        assert_eq!(walk.lookup("30 to 34 years").unwrap().to, "25 to 44 years");
        assert_eq!(walk.lookup("55 to 64 years").unwrap().to, "45 to 64 years");
        assert_eq!(
            walk.lookup("85 years and over").unwrap().to,
            "65 years and over"
        );
        assert!(walk.weak_entries(1.0).is_empty());
    }

    #[test]
    fn test_reverse_groups_in_target_order() {
        let walk = build_crosswalk(
            &Matcher::default(),
            Family::Age,
            Family::Age.standard_labels(),
            AGE_INCOME_RANGES,
        )
        .unwrap();
        let reverse = walk.reverse();
        let keys: Vec<&String> = reverse.keys().collect();
        assert_eq!(keys, AGE_INCOME_RANGES);
        assert_eq!(reverse["Under 25 years"].len(), 6);
        assert_eq!(
            reverse["25 to 44 years"],
            vec!["25 to 29 years", "30 to 34 years", "35 to 44 years"]
        );
        assert_eq!(reverse["65 years and over"].len(), 3);
    }

    #[test]
    fn test_education_crosswalk_collapses_detailed_levels() {
        let walk = build_crosswalk(
            &Matcher::default(),
            Family::Education,
            &["Less than 9th grade", "9th to 12th grade, no diploma", "Master's degree"],
            &["Less than high school graduate", "Bachelor's degree", "Graduate degree"],
        )
        .unwrap();
        assert_eq!(
            walk.lookup("9th to 12th grade, no diploma").unwrap().to,
            "Less than high school graduate"
        );
        assert_eq!(walk.lookup("Master's degree").unwrap().to, "Graduate degree");
    }

    #[test]
    fn test_empty_target_vocabulary_errors() {
        let empty: [&str; 0] = [];
        assert!(build_crosswalk(
            &Matcher::default(),
            Family::Age,
            &["Under 5 years"],
            &empty
        )
        .is_err());
    }
}
