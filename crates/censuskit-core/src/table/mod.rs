//! # Joint Distribution Tables
//!
//! A sparse two-dimensional count table over two category families, as
//! handed over by a table provider. Missing combinations are implicit zeros.
//! Tables are read-only once constructed; marginals and conditionals are
//! derived on demand in one pass over the cells.

pub mod conditional;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryValue, Family, Normalizer};
use crate::error::{CensusKitError, Result};

pub use conditional::{condition_on, ConditionalDistribution};

/// Ordering uses the default open-ended bounds; caps only break ties between
/// brackets sharing a lower bound.
static ORDERING: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// One axis of a joint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    A,
    B,
}

impl Dimension {
    pub fn other(self) -> Dimension {
        match self {
            Dimension::A => Dimension::B,
            Dimension::B => Dimension::A,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::A => f.write_str("a"),
            Dimension::B => f.write_str("b"),
        }
    }
}

impl FromStr for Dimension {
    type Err = CensusKitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Dimension::A),
            "b" => Ok(Dimension::B),
            other => Err(CensusKitError::UnknownDimension {
                name: other.to_string(),
            }),
        }
    }
}

/// A single `(a, b) → count` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub a: String,
    pub b: String,
    pub count: u64,
}

impl Cell {
    pub fn new(a: impl Into<String>, b: impl Into<String>, count: u64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            count,
        }
    }

    pub fn label(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::A => &self.a,
            Dimension::B => &self.b,
        }
    }
}

/// One row of a one-dimensional distribution.
///
/// Serializes as `{"category", "value", "percentage"}`, the shape the
/// presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub category: String,
    pub value: u64,
    pub percentage: f64,
}

/// The distribution of one axis summed over the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marginal {
    pub dimension: Dimension,
    pub family: Family,
    pub data: Vec<DistributionRow>,
    pub total: u64,
}

impl Marginal {
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|r| r.category.as_str())
    }
}

/// Wire/deserialization shape of a table, validated into
/// `JointDistributionTable` through `TryFrom`.
#[derive(Debug, Clone, Deserialize)]
struct RawTable {
    family_a: Family,
    family_b: Family,
    #[serde(default)]
    cells: Vec<Cell>,
    #[serde(default)]
    location: serde_json::Value,
    #[serde(default)]
    source: String,
}

/// A sparse joint count table over two families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct JointDistributionTable {
    family_a: Family,
    family_b: Family,
    cells: Vec<Cell>,
    /// Opaque location descriptor, passed through unchanged.
    location: serde_json::Value,
    /// Data source citation, passed through unchanged.
    source: String,
}

impl TryFrom<RawTable> for JointDistributionTable {
    type Error = CensusKitError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Ok(Self::new(raw.family_a, raw.family_b, raw.cells)?
            .with_location(raw.location)
            .with_source(raw.source))
    }
}

impl JointDistributionTable {
    /// Build a table. Both axes must be of different families, otherwise
    /// conditioning on a family would be ambiguous.
    pub fn new(family_a: Family, family_b: Family, cells: Vec<Cell>) -> Result<Self> {
        if family_a == family_b {
            return Err(CensusKitError::InvalidTable {
                message: format!(
                    "both axes are {}; a joint table needs two families",
                    family_a
                ),
            });
        }
        Ok(Self {
            family_a,
            family_b,
            cells,
            location: serde_json::Value::Null,
            source: String::new(),
        })
    }

    pub fn with_location(mut self, location: serde_json::Value) -> Self {
        self.location = location;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn family(&self, dimension: Dimension) -> Family {
        match dimension {
            Dimension::A => self.family_a,
            Dimension::B => self.family_b,
        }
    }

    /// The axis carrying `family`, if any.
    pub fn dimension_for(&self, family: Family) -> Option<Dimension> {
        if self.family_a == family {
            Some(Dimension::A)
        } else if self.family_b == family {
            Some(Dimension::B)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn location(&self) -> &serde_json::Value {
        &self.location
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of all cell counts, saturating at `u64::MAX`.
    pub fn grand_total(&self) -> u64 {
        saturating_total(self.cells.iter().map(|c| c.count))
    }

    /// Whether `label` appears anywhere on the axis (even with a zero count).
    pub fn contains(&self, dimension: Dimension, label: &str) -> bool {
        self.cells.iter().any(|c| c.label(dimension) == label)
    }

    /// Distinct values on an axis, in the family's canonical order.
    pub fn candidates(&self, dimension: Dimension) -> Vec<CategoryValue> {
        let family = self.family(dimension);
        let mut labels: Vec<&str> = Vec::new();
        for cell in &self.cells {
            let label = cell.label(dimension);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        sort_labels(family, &mut labels, |l| *l);
        labels
            .into_iter()
            .map(|l| CategoryValue::new(family, l))
            .collect()
    }

    /// Group by one axis, sum counts, and express each as a share of the
    /// grand total. A zero grand total yields zero percentages.
    pub fn marginal(&self, dimension: Dimension) -> Marginal {
        let family = self.family(dimension);
        let rows = group_counts(
            family,
            self.cells.iter().map(|c| (c.label(dimension), c.count)),
        );
        let total = saturating_total(rows.iter().map(|(_, v)| *v));
        Marginal {
            dimension,
            family,
            data: to_rows(rows, total),
            total,
        }
    }

    /// See [`conditional::condition_on`].
    pub fn condition_on(&self, dimension: Dimension, label: &str) -> ConditionalDistribution {
        conditional::condition_on(self, dimension, label)
    }

    /// Axis labels outside the family's known vocabulary.
    pub fn unrecognized_labels(
        &self,
        dimension: Dimension,
        normalizer: &Normalizer,
    ) -> Vec<String> {
        let family = self.family(dimension);
        self.candidates(dimension)
            .into_iter()
            .filter(|v| !normalizer.is_recognized(family, &v.label))
            .map(|v| v.label)
            .collect()
    }
}

/// Sum of counts, clamped at `u64::MAX`.
pub(crate) fn saturating_total(counts: impl IntoIterator<Item = u64>) -> u64 {
    counts.into_iter().fold(0, u64::saturating_add)
}

/// Sum counts per label, keeping first-appearance order, then sort into the
/// family's canonical order (stable, so unranked labels keep their order).
pub(crate) fn group_counts<'a>(
    family: Family,
    pairs: impl Iterator<Item = (&'a str, u64)>,
) -> Vec<(&'a str, u64)> {
    let mut grouped: IndexMap<&'a str, u64> = IndexMap::new();
    for (label, count) in pairs {
        let sum = grouped.entry(label).or_insert(0);
        *sum = sum.saturating_add(count);
    }
    let mut rows: Vec<(&str, u64)> = grouped.into_iter().collect();
    sort_labels(family, &mut rows, |row| row.0);
    rows
}

pub(crate) fn to_rows(rows: Vec<(&str, u64)>, total: u64) -> Vec<DistributionRow> {
    rows.into_iter()
        .map(|(category, value)| DistributionRow {
            category: category.to_string(),
            value,
            percentage: if total > 0 {
                value as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn sort_labels<T>(family: Family, items: &mut [T], label: impl Fn(&T) -> &str) {
    items.sort_by(|x, y| {
        ORDERING
            .sort_key(family, label(x))
            .cmp_key(&ORDERING.sort_key(family, label(y)))
    });
}
