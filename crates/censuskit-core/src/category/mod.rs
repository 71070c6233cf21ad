//! # Category Families and Values
//!
//! A census axis is labelled in one of a small, closed set of families.
//! Values are only comparable inside a family; the family also decides how a
//! label is normalized and which matching strategy reconciles it against
//! another table's vocabulary.

pub mod normalize;
pub mod vocabulary;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CensusKitError;
use crate::matcher::MatchStrategy;

pub use normalize::{Interval, Normalizer, OpenBounds, DEFAULT_AGE_CAP, DEFAULT_INCOME_CAP};

/// The type of a category axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Age,
    Income,
    Education,
    Profession,
    Race,
    Gender,
}

impl Family {
    /// Every family, in declaration order.
    pub const ALL: [Family; 6] = [
        Family::Age,
        Family::Income,
        Family::Education,
        Family::Profession,
        Family::Race,
        Family::Gender,
    ];

    /// The matching strategy tried first for values of this family.
    ///
    /// Race starts with token overlap so its synonym hints can fire, and only
    /// consults the hierarchy when that step comes back weak.
    pub fn strategy(self) -> MatchStrategy {
        match self {
            Family::Age | Family::Income => MatchStrategy::IntervalOverlap,
            Family::Education | Family::Profession => MatchStrategy::HierarchyDistance,
            Family::Race | Family::Gender => MatchStrategy::TokenOverlap,
        }
    }

    /// Whether a weak token-overlap match falls back to hierarchy distance.
    pub fn has_hierarchy_fallback(self) -> bool {
        matches!(self, Family::Race)
    }

    /// Whether values of this family carry a numeric interval.
    pub fn is_numeric(self) -> bool {
        matches!(self, Family::Age | Family::Income)
    }

    /// The fixed canonical ordering of this family, if it has one.
    ///
    /// Numeric families are ordered by their intervals instead.
    pub fn hierarchy(self) -> Option<&'static [&'static str]> {
        match self {
            Family::Age | Family::Income => None,
            Family::Education => Some(vocabulary::EDUCATION_HIERARCHY),
            Family::Profession => Some(vocabulary::PROFESSION_HIERARCHY),
            Family::Race => Some(vocabulary::RACE_HIERARCHY),
            Family::Gender => Some(vocabulary::GENDER_HIERARCHY),
        }
    }

    /// The standard census vocabulary for this family.
    pub fn standard_labels(self) -> &'static [&'static str] {
        match self {
            Family::Age => vocabulary::STANDARD_AGE_RANGES,
            Family::Income => vocabulary::STANDARD_INCOME_RANGES,
            Family::Education => vocabulary::STANDARD_EDUCATION_LEVELS,
            Family::Profession => vocabulary::STANDARD_PROFESSIONS,
            Family::Race => vocabulary::STANDARD_RACE_ETHNICITY,
            Family::Gender => vocabulary::STANDARD_GENDERS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::Age => "age",
            Family::Income => "income",
            Family::Education => "education",
            Family::Profession => "profession",
            Family::Race => "race",
            Family::Gender => "gender",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = CensusKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "age" => Ok(Family::Age),
            "income" => Ok(Family::Income),
            "education" => Ok(Family::Education),
            "profession" | "occupation" => Ok(Family::Profession),
            "race" | "ethnicity" | "race_ethnicity" => Ok(Family::Race),
            "gender" | "sex" => Ok(Family::Gender),
            other => Err(CensusKitError::UnknownFamily {
                name: other.to_string(),
            }),
        }
    }
}

/// A category label tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryValue {
    pub label: String,
    pub family: Family,
}

impl CategoryValue {
    pub fn new(family: Family, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            family,
        }
    }

    /// Two values are comparable only within the same family.
    pub fn is_comparable(&self, other: &CategoryValue) -> bool {
        self.family == other.family
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.family, self.label)
    }
}
