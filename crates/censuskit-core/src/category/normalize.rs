use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vocabulary::{
    EDUCATION_SYNONYMS, GENDER_SYNONYMS, PROFESSION_SYNONYMS, RACE_SYNONYMS,
};
use super::Family;

/// Conventional upper bound for open-ended age brackets ("85 years and over").
pub const DEFAULT_AGE_CAP: f64 = 120.0;

/// Conventional upper bound for open-ended income brackets ("$200,000 or more").
pub const DEFAULT_INCOME_CAP: f64 = 500_000.0;

/// Digit groups, with an optional decimal part. Thousands separators and
/// currency signs are stripped before matching.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const OPEN_ENDED_PHRASES: &[&str] = &[
    "and over",
    "or more",
    "and older",
    "or older",
    "and above",
    "or above",
    "plus",
    "+",
];

const UPPER_BOUND_PHRASES: &[&str] = &["under", "less than", "below", "younger than"];

const LOSS_PHRASES: &[&str] = &["loss", "negative", "no income"];

/// Upper bounds assigned to open-ended brackets so interval arithmetic stays
/// total. These are policy choices, not facts derivable from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenBounds {
    pub age_cap: f64,
    pub income_cap: f64,
}

impl Default for OpenBounds {
    fn default() -> Self {
        Self {
            age_cap: DEFAULT_AGE_CAP,
            income_cap: DEFAULT_INCOME_CAP,
        }
    }
}

impl OpenBounds {
    /// The cap for a numeric family. Nominal families have no interval and
    /// fall back to the age cap, which is never consulted for them.
    pub fn cap_for(&self, family: Family) -> f64 {
        match family {
            Family::Income => self.income_cap,
            _ => self.age_cap,
        }
    }
}

/// A closed numeric interval `[low, high]` derived from a bracket label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        if low <= high {
            Self { low, high }
        } else {
            Self {
                low: high,
                high: low,
            }
        }
    }

    pub fn len(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Length of the intersection with `other` (0 when disjoint or touching).
    pub fn overlap(&self, other: &Interval) -> f64 {
        (self.high.min(other.high) - self.low.max(other.low)).max(0.0)
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.low <= other.low && other.high <= self.high
    }

    pub fn contains_point(&self, x: f64) -> bool {
        self.low <= x && x <= self.high
    }
}

/// How an interval was derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntervalSource {
    Parsed,
    Fallback,
}

/// Sort key used to put category values in their family's canonical order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Numeric(f64, f64),
    Ranked(usize),
    Unranked,
}

impl SortKey {
    pub(crate) fn cmp_key(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(al, ah), SortKey::Numeric(bl, bh)) => {
                al.total_cmp(bl).then(ah.total_cmp(bh))
            }
            (SortKey::Ranked(a), SortKey::Ranked(b)) => a.cmp(b),
            (SortKey::Unranked, SortKey::Unranked) => Ordering::Equal,
            (SortKey::Unranked, _) => Ordering::Greater,
            (_, SortKey::Unranked) => Ordering::Less,
            (SortKey::Numeric(..), SortKey::Ranked(_)) => Ordering::Less,
            (SortKey::Ranked(_), SortKey::Numeric(..)) => Ordering::Greater,
        }
    }
}

/// Maps free-form source labels to canonical keys within a family.
///
/// Every method is total: unrecognized labels resolve to a safe default
/// (a `[0, cap]` interval, or the cleaned label itself) rather than an error.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    bounds: OpenBounds,
}

impl Normalizer {
    pub fn new(bounds: OpenBounds) -> Self {
        Self { bounds }
    }

    /// Canonical key for equality comparison inside `family`.
    ///
    /// Numeric families compare by interval (`"25..34"`); the rest go through
    /// the family's synonym table, passing unmapped labels through in cleaned
    /// form.
    pub fn canonical(&self, family: Family, label: &str) -> String {
        match family {
            Family::Age | Family::Income => {
                let interval = self.interval_of(family, label);
                format!("{}..{}", interval.low, interval.high)
            }
            _ => {
                let cleaned = clean_label(label);
                match synonym_table(family)
                    .iter()
                    .find(|(surface, _)| *surface == cleaned)
                {
                    Some((_, canonical)) => (*canonical).to_string(),
                    None => cleaned,
                }
            }
        }
    }

    /// The numeric interval of a bracket label, or `None` for nominal families.
    pub fn interval(&self, family: Family, label: &str) -> Option<Interval> {
        family
            .is_numeric()
            .then(|| self.interval_of(family, label))
    }

    /// Position of the label's canonical form in the family hierarchy.
    pub fn hierarchy_index(&self, family: Family, label: &str) -> Option<usize> {
        let hierarchy = family.hierarchy()?;
        let canonical = self.canonical(family, label);
        hierarchy.iter().position(|h| *h == canonical)
    }

    /// Whether the label is part of the family's known vocabulary: a parseable
    /// bracket for numeric families, a hierarchy member otherwise.
    pub fn is_recognized(&self, family: Family, label: &str) -> bool {
        if family.is_numeric() {
            parse_interval(family, label, &self.bounds).1 == IntervalSource::Parsed
        } else {
            self.hierarchy_index(family, label).is_some()
        }
    }

    pub(crate) fn interval_of(&self, family: Family, label: &str) -> Interval {
        parse_interval(family, label, &self.bounds).0
    }

    pub(crate) fn sort_key(&self, family: Family, label: &str) -> SortKey {
        if family.is_numeric() {
            let (interval, source) = parse_interval(family, label, &self.bounds);
            match source {
                IntervalSource::Parsed => SortKey::Numeric(interval.low, interval.high),
                IntervalSource::Fallback => SortKey::Unranked,
            }
        } else {
            match self.hierarchy_index(family, label) {
                Some(idx) => SortKey::Ranked(idx),
                None => SortKey::Unranked,
            }
        }
    }
}

/// Lowercase, trim, unify apostrophes, collapse whitespace and drop a
/// trailing colon (census API labels often end in one).
pub(crate) fn clean_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let collapsed = WHITESPACE_RE.replace_all(&lowered, " ");
    collapsed.trim_end_matches(':').trim().to_string()
}

fn synonym_table(family: Family) -> &'static [(&'static str, &'static str)] {
    match family {
        Family::Education => EDUCATION_SYNONYMS,
        Family::Profession => PROFESSION_SYNONYMS,
        Family::Race => RACE_SYNONYMS,
        Family::Gender => GENDER_SYNONYMS,
        Family::Age | Family::Income => &[],
    }
}

/// Derive `[low, high]` from a bracket label using fixed textual rules.
fn parse_interval(family: Family, label: &str, bounds: &OpenBounds) -> (Interval, IntervalSource) {
    let text = clean_label(label);
    let stripped = text.replace([',', '$'], "");
    let numbers: Vec<f64> = NUMBER_RE
        .find_iter(&stripped)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    let cap = bounds.cap_for(family);

    let interval = match numbers.as_slice() {
        [low, high, ..] => Interval::new(*low, *high),
        [n] => {
            let n = *n;
            if OPEN_ENDED_PHRASES.iter().any(|p| text.contains(p)) {
                Interval::new(n, cap.max(n))
            } else if UPPER_BOUND_PHRASES.iter().any(|p| text.contains(p)) {
                Interval::new(0.0, n)
            } else if contains_word(&text, "and") {
                Interval::new(n, n + 1.0)
            } else if family == Family::Age {
                Interval::new(n, n + 1.0)
            } else {
                Interval::new(n, n)
            }
        }
        [] => {
            if LOSS_PHRASES.iter().any(|p| text.contains(p)) {
                Interval::new(0.0, 0.0)
            } else {
                return (Interval::new(0.0, cap), IntervalSource::Fallback);
            }
        }
    };
    (interval, IntervalSource::Parsed)
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split_whitespace().any(|w| w == word)
}
