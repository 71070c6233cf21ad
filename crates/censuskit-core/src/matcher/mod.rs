//! # Category Matching
//!
//! Reconciles a target category value against the vocabulary of a table axis
//! that was binned or labelled differently. The family of the target picks
//! one of three strategies:
//!
//! - **Interval overlap** (age, income): how much of the target's range each
//!   candidate covers. Asymmetric on purpose, so a fine target inside a coarse
//!   bucket scores 1.0.
//! - **Hierarchy distance** (education, profession): index distance in the
//!   family's fixed ordering, after an exact canonical check.
//! - **Token overlap** (race, gender, and the fallback for unseen hierarchy
//!   vocabulary): shared words plus hand-curated synonym hints. Race falls
//!   back to hierarchy distance when the best token score is below
//!   [`token::WEAK_SCORE`] or no candidate shared a term.
//!
//! Matching is total over non-empty candidate lists: some candidate is always
//! returned, with a score and an explanation the caller can surface.

pub mod crosswalk;
pub mod hierarchy;
pub mod interval;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::category::{CategoryValue, Family, Normalizer};
use crate::error::{CensusKitError, Result};

pub use crosswalk::{build_crosswalk, Crosswalk, CrosswalkEntry};

/// Which branch of the matcher produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    IntervalOverlap,
    HierarchyDistance,
    TokenOverlap,
}

/// The numeric basis of a match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchBasis {
    /// Canonical forms are equal.
    Exact,
    /// Fraction of the target interval covered by the candidate.
    Coverage { coverage: f64 },
    /// No candidate overlaps; distance between interval midpoints.
    NearestMidpoint { distance: f64 },
    /// Index distance in the family hierarchy.
    HierarchyDistance { distance: usize },
    /// Shared-token ratio.
    TokenRatio { ratio: f64 },
    /// A family synonym hint fired.
    Synonym { trigger: String },
    /// Nothing matched; first candidate returned.
    Fallback,
}

/// The outcome of reconciling one target against a candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: CategoryValue,
    /// In `[0, 1]`. Exactly 0 means no real correspondence was found.
    pub score: f64,
    pub explanation: String,
    pub strategy: MatchStrategy,
    pub basis: MatchBasis,
}

impl MatchResult {
    /// Whether target and match share a canonical form. Full interval
    /// coverage also scores 1.0 but is not exact.
    pub fn is_exact(&self) -> bool {
        self.basis == MatchBasis::Exact
    }
}

/// A strategy's pick, by candidate position.
#[derive(Debug, Clone)]
pub(crate) struct Scored {
    pub index: usize,
    pub score: f64,
    pub strategy: MatchStrategy,
    pub basis: MatchBasis,
    pub explanation: String,
}

/// Dispatches targets to the strategy of their family.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    normalizer: Normalizer,
}

impl Matcher {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Select the best candidate for `target`.
    ///
    /// Fails only on misuse: an empty candidate list, or a candidate from a
    /// different family than the target.
    pub fn match_value(
        &self,
        target: &CategoryValue,
        candidates: &[CategoryValue],
    ) -> Result<MatchResult> {
        if candidates.is_empty() {
            return Err(CensusKitError::NoCandidates {
                family: target.family,
                target: target.label.clone(),
            });
        }
        if let Some(stray) = candidates.iter().find(|c| !c.is_comparable(target)) {
            return Err(CensusKitError::FamilyMismatch {
                target: target.label.clone(),
                label: stray.label.clone(),
                expected: target.family,
                found: stray.family,
            });
        }

        let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
        let scored = self.score(target.family, &target.label, &labels);

        tracing::debug!(
            "matched {} '{}' -> '{}' (score {:.2}, {:?})",
            target.family,
            target.label,
            labels[scored.index],
            scored.score,
            scored.strategy
        );

        Ok(MatchResult {
            matched: candidates[scored.index].clone(),
            score: scored.score.clamp(0.0, 1.0),
            explanation: scored.explanation,
            strategy: scored.strategy,
            basis: scored.basis,
        })
    }

    /// Convenience wrapper over plain labels of one family.
    pub fn match_label<S: AsRef<str>>(
        &self,
        family: Family,
        target: &str,
        candidates: &[S],
    ) -> Result<MatchResult> {
        let target = CategoryValue::new(family, target);
        let candidates: Vec<CategoryValue> = candidates
            .iter()
            .map(|c| CategoryValue::new(family, c.as_ref()))
            .collect();
        self.match_value(&target, &candidates)
    }

    /// Strategy dispatch over a non-empty candidate list.
    fn score(&self, family: Family, target: &str, candidates: &[&str]) -> Scored {
        match family.strategy() {
            MatchStrategy::IntervalOverlap => {
                interval::best_overlap(&self.normalizer, family, target, candidates)
            }
            MatchStrategy::HierarchyDistance => {
                hierarchy::best_in_hierarchy(&self.normalizer, family, target, candidates)
                    .unwrap_or_else(|| {
                        token::best_token_overlap(&self.normalizer, family, target, candidates)
                    })
            }
            MatchStrategy::TokenOverlap => {
                let scored =
                    token::best_token_overlap(&self.normalizer, family, target, candidates);
                if !family.has_hierarchy_fallback() || !token::is_weak(&scored) {
                    return scored;
                }
                hierarchy::best_in_hierarchy(&self.normalizer, family, target, candidates)
                    .unwrap_or(scored)
            }
        }
    }
}

/// Match with the default normalizer bounds.
pub fn find_best_match<S: AsRef<str>>(
    family: Family,
    target: &str,
    candidates: &[S],
) -> Result<MatchResult> {
    Matcher::default().match_label(family, target, candidates)
}
