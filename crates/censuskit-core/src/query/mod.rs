//! # Unified Query Orchestration
//!
//! Fans one canonical query ("income distribution for people aged 25 to 34")
//! out over several joint tables that bin the queried family differently.
//! Each source is matched and conditioned independently; a failing source is
//! reported with `status: error` and never affects the others.

pub mod engine;
pub mod provider;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryValue, Family};
use crate::error::{CensusKitError, Result};
use crate::matcher::{MatchBasis, Matcher};
use crate::table::{Dimension, DistributionRow, JointDistributionTable};

pub use engine::{QueryEngine, SourceSpec, DEFAULT_MAX_CONCURRENCY};
pub use provider::{JsonFileProvider, QueryContext, StaticProvider, TableProvider, TableRequest};

/// A table (or the failure to obtain one) registered under a source id.
#[derive(Debug)]
pub struct SourceRegistration {
    pub id: String,
    /// Display name, e.g. "Income Distribution".
    pub name: String,
    pub table: Result<JointDistributionTable>,
    /// Axis to condition on. Inferred from the queried family when `None`.
    pub axis: Option<Dimension>,
}

impl SourceRegistration {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        table: JointDistributionTable,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            table: Ok(table),
            axis: None,
        }
    }

    /// A source whose table could not be acquired.
    pub fn failed(id: impl Into<String>, name: impl Into<String>, error: CensusKitError) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            table: Err(error),
            axis: None,
        }
    }

    pub fn with_axis(mut self, axis: Option<Dimension>) -> Self {
        self.axis = axis;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Success,
    /// Matched, but the conditioned subtotal is zero (suppressed or empty).
    NoData,
    Error,
}

/// Per-source outcome of a unified query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    pub status: SourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_basis: Option<MatchBasis>,
    #[serde(default)]
    pub distribution: Vec<DistributionRow>,
    #[serde(default)]
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceEntry {
    fn error(name: &str, error: &CensusKitError) -> Self {
        Self {
            name: name.to_string(),
            status: SourceStatus::Error,
            matched: None,
            match_score: None,
            match_explanation: None,
            match_basis: None,
            distribution: Vec::new(),
            total: 0,
            data_source: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub successful: usize,
    pub total: usize,
}

/// Merged result of one query across every registered source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedResult {
    pub family: Family,
    pub target: String,
    /// Source id → outcome, in registration order.
    pub sources: IndexMap<String, SourceEntry>,
    pub summary: Summary,
    /// Location metadata of the first successful source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
}

impl UnifiedResult {
    pub fn successful(&self) -> impl Iterator<Item = (&String, &SourceEntry)> {
        self.sources
            .iter()
            .filter(|(_, e)| e.status == SourceStatus::Success)
    }
}

/// Match `value` against every source's `family` axis and condition on the
/// matched label.
///
/// Every registration yields exactly one entry. A repeated source id is not
/// evaluated: it is reported as an error entry under `"<id>#<n>"`, where `n`
/// counts occurrences of that id.
pub fn reconcile_and_condition(
    family: Family,
    value: &str,
    sources: &[SourceRegistration],
    matcher: &Matcher,
) -> UnifiedResult {
    let target = CategoryValue::new(family, value);
    let mut entries = IndexMap::with_capacity(sources.len());
    let mut location = None;

    for source in sources {
        if entries.contains_key(&source.id) {
            let error = CensusKitError::DuplicateSource {
                source_id: source.id.clone(),
            };
            tracing::warn!("{}", error);
            let key = duplicate_key(&entries, &source.id);
            entries.insert(key, SourceEntry::error(&source.name, &error));
            continue;
        }

        let entry = match evaluate(&target, source, matcher) {
            Ok((entry, table)) => {
                if entry.status == SourceStatus::Success && location.is_none() {
                    let loc = table.location();
                    if !loc.is_null() {
                        location = Some(loc.clone());
                    }
                }
                entry
            }
            Err(e) => {
                tracing::warn!("source '{}' failed: {}", source.id, e);
                SourceEntry::error(&source.name, &e)
            }
        };
        entries.insert(source.id.clone(), entry);
    }

    let successful = entries
        .values()
        .filter(|e| e.status == SourceStatus::Success)
        .count();

    UnifiedResult {
        family,
        target: value.to_string(),
        summary: Summary {
            successful,
            total: entries.len(),
        },
        sources: entries,
        location,
    }
}

fn duplicate_key(entries: &IndexMap<String, SourceEntry>, id: &str) -> String {
    (2..)
        .map(|n| format!("{}#{}", id, n))
        .find(|key| !entries.contains_key(key))
        .unwrap_or_else(|| id.to_string())
}

fn evaluate<'a>(
    target: &CategoryValue,
    source: &'a SourceRegistration,
    matcher: &Matcher,
) -> Result<(SourceEntry, &'a JointDistributionTable)> {
    let table = match &source.table {
        Ok(table) => table,
        Err(e) => {
            return Err(CensusKitError::Provider {
                source_id: source.id.clone(),
                message: e.to_string(),
            })
        }
    };

    let missing_axis = || CensusKitError::MissingAxis {
        source_id: source.id.clone(),
        family: target.family,
        family_a: table.family(Dimension::A),
        family_b: table.family(Dimension::B),
    };
    let dimension = match source.axis {
        Some(axis) if table.family(axis) == target.family => axis,
        Some(_) => return Err(missing_axis()),
        None => table.dimension_for(target.family).ok_or_else(missing_axis)?,
    };

    let candidates = table.candidates(dimension);
    let result = matcher.match_value(target, &candidates)?;
    let conditional = table.condition_on(dimension, &result.matched.label);

    let status = if conditional.is_empty() {
        SourceStatus::NoData
    } else {
        SourceStatus::Success
    };
    tracing::debug!(
        "source '{}': '{}' -> '{}' ({:?}, total {})",
        source.id,
        target.label,
        result.matched.label,
        status,
        conditional.total
    );

    let data_source = if table.source().is_empty() {
        None
    } else {
        Some(table.source().to_string())
    };

    Ok((
        SourceEntry {
            name: source.name.clone(),
            status,
            matched: Some(result.matched.label),
            match_score: Some(result.score),
            match_explanation: Some(result.explanation),
            match_basis: Some(result.basis),
            distribution: conditional.data,
            total: conditional.total,
            data_source,
            error: None,
        },
        table,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn age_income() -> JointDistributionTable {
        JointDistributionTable::new(
            Family::Age,
            Family::Income,
            vec![
                Cell::new("25 to 44 years", "Less than $10,000", 10),
                Cell::new("25 to 44 years", "$10,000 to $14,999", 30),
                Cell::new("45 to 64 years", "Less than $10,000", 5),
            ],
        )
        .unwrap()
        .with_location(serde_json::json!({"county_name": "Alameda County"}))
        .with_source("ACS 5-Year Estimates (2023), Table B19037")
    }

    fn gender_age() -> JointDistributionTable {
        JointDistributionTable::new(
            Family::Gender,
            Family::Age,
            vec![
                Cell::new("Male", "25 to 29 years", 7),
                Cell::new("Female", "30 to 34 years", 9),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_matches_and_conditions_each_source() {
        let sources = vec![
            SourceRegistration::new("age_income", "Income Distribution", age_income()),
            SourceRegistration::new("age_gender", "Gender Distribution", gender_age()),
        ];
        let result =
            reconcile_and_condition(Family::Age, "30 to 34 years", &sources, &Matcher::default());

        assert_eq!(result.summary, Summary { successful: 2, total: 2 });
        let income = &result.sources["age_income"];
        assert_eq!(income.matched.as_deref(), Some("25 to 44 years"));
        assert_eq!(income.match_score, Some(1.0));
        assert_eq!(income.total, 40);

        // The age axis is B in the second table.
        let gender = &result.sources["age_gender"];
        assert_eq!(gender.matched.as_deref(), Some("30 to 34 years"));
        assert_eq!(gender.distribution.len(), 1);
        assert_eq!(gender.distribution[0].category, "Female");
        assert_eq!(result.location.unwrap()["county_name"], "Alameda County");
    }

    #[test]
    fn test_failed_source_is_isolated() {
        let sources = vec![
            SourceRegistration::failed(
                "broken",
                "Broken",
                CensusKitError::Other("upstream timed out".into()),
            ),
            SourceRegistration::new("age_income", "Income Distribution", age_income()),
        ];
        let result =
            reconcile_and_condition(Family::Age, "25 to 34 years", &sources, &Matcher::default());

        let broken = &result.sources["broken"];
        assert_eq!(broken.status, SourceStatus::Error);
        assert!(broken.error.as_ref().unwrap().contains("upstream timed out"));
        assert_eq!(result.sources["age_income"].status, SourceStatus::Success);
        assert_eq!(result.summary, Summary { successful: 1, total: 2 });
        let keys: Vec<&String> = result.sources.keys().collect();
        assert_eq!(keys, vec!["broken", "age_income"]);
    }

    #[test]
    fn test_missing_axis_is_an_error_entry() {
        let sources = vec![SourceRegistration::new("gender", "Gender", gender_age())];
        let result = reconcile_and_condition(
            Family::Education,
            "Bachelor's degree",
            &sources,
            &Matcher::default(),
        );
        let entry = &result.sources["gender"];
        assert_eq!(entry.status, SourceStatus::Error);
        assert!(entry.error.as_ref().unwrap().contains("no education axis"));
        assert!(result.location.is_none());
    }

    #[test]
    fn test_explicit_axis_must_carry_family() {
        let sources = vec![
            SourceRegistration::new("age_income", "Income", age_income())
                .with_axis(Some(Dimension::B)),
        ];
        let result =
            reconcile_and_condition(Family::Age, "25 to 34 years", &sources, &Matcher::default());
        assert_eq!(result.sources["age_income"].status, SourceStatus::Error);
    }

    #[test]
    fn test_empty_axis_is_an_error_entry() {
        let empty = JointDistributionTable::new(Family::Age, Family::Income, vec![]).unwrap();
        let sources = vec![SourceRegistration::new("empty", "Empty", empty)];
        let result =
            reconcile_and_condition(Family::Age, "25 to 34 years", &sources, &Matcher::default());
        assert_eq!(result.sources["empty"].status, SourceStatus::Error);
    }

    #[test]
    fn test_zero_subtotal_is_no_data() {
        let table = JointDistributionTable::new(
            Family::Age,
            Family::Gender,
            vec![Cell::new("85 years and over", "Male", 0)],
        )
        .unwrap();
        let sources = vec![SourceRegistration::new("suppressed", "Suppressed", table)];
        let result =
            reconcile_and_condition(Family::Age, "85 years and over", &sources, &Matcher::default());
        let entry = &result.sources["suppressed"];
        assert_eq!(entry.status, SourceStatus::NoData);
        assert_eq!(entry.matched.as_deref(), Some("85 years and over"));
        assert!(entry.distribution.is_empty());
        assert_eq!(result.summary.successful, 0);
    }

    #[test]
    fn test_duplicate_source_id_keeps_every_registration() {
        let sources = vec![
            SourceRegistration::new("x", "First", age_income()),
            SourceRegistration::new("x", "Second", age_income()),
            SourceRegistration::new("x", "Third", age_income()),
        ];
        let result =
            reconcile_and_condition(Family::Age, "25 to 34 years", &sources, &Matcher::default());

        let keys: Vec<&String> = result.sources.keys().collect();
        assert_eq!(keys, vec!["x", "x#2", "x#3"]);
        assert_eq!(result.sources["x"].name, "First");
        assert_eq!(result.sources["x"].status, SourceStatus::Success);
        let second = &result.sources["x#2"];
        assert_eq!(second.name, "Second");
        assert_eq!(second.status, SourceStatus::Error);
        assert!(second.error.as_ref().unwrap().contains("registered more than once"));
        assert_eq!(result.summary, Summary { successful: 1, total: 3 });
    }

    #[test]
    fn test_race_query_prefers_origin_row_over_neighbour() {
        let table = JointDistributionTable::new(
            Family::Age,
            Family::Race,
            vec![
                Cell::new("18 to 64 years", "White alone", 50),
                Cell::new("18 to 64 years", "Two or more races", 10),
                Cell::new("18 to 64 years", "Hispanic or Latino origin (of any race)", 30),
                Cell::new("65 years and over", "Hispanic or Latino origin (of any race)", 10),
            ],
        )
        .unwrap();
        let sources = vec![SourceRegistration::new("age_race", "Race", table)];
        let result =
            reconcile_and_condition(Family::Race, "Hispanic or Latino", &sources, &Matcher::default());

        let entry = &result.sources["age_race"];
        assert_eq!(
            entry.matched.as_deref(),
            Some("Hispanic or Latino origin (of any race)")
        );
        assert_eq!(entry.match_score, Some(0.9));
        assert!(entry
            .match_explanation
            .as_ref()
            .unwrap()
            .starts_with("Hispanic/Latino variation match"));
        assert_eq!(entry.total, 40);
    }

    #[test]
    fn test_serializes_statuses_snake_case() {
        let sources = vec![SourceRegistration::new("age_income", "Income", age_income())];
        let result =
            reconcile_and_condition(Family::Age, "50 to 54 years", &sources, &Matcher::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["family"], "age");
        assert_eq!(json["sources"]["age_income"]["status"], "success");
        assert_eq!(json["sources"]["age_income"]["distribution"][0]["value"], 5);
        assert!(json["sources"]["age_income"].get("error").is_none());
    }
}
