//! Token-overlap matching with family synonym hints.

use std::collections::BTreeSet;

use crate::category::normalize::clean_label;
use crate::category::vocabulary::{SynonymTrigger, GENDER_TRIGGERS, RACE_TRIGGERS, STOP_WORDS};
use crate::category::{Family, Normalizer};

use super::hierarchy::exact_canonical;
use super::{MatchBasis, MatchStrategy, Scored};

/// Score assigned when nothing shares a single token with the target.
pub const FALLBACK_SCORE: f64 = 0.2;

/// Below this, a family with a hierarchy fallback consults its hierarchy.
pub const WEAK_SCORE: f64 = 0.5;

/// Lowercased word tokens of a label with stop words removed.
///
/// Splits on every character that is neither alphanumeric nor an apostrophe,
/// not only on whitespace, so punctuation never sticks to a word: the "alone,"
/// in "White alone, not Hispanic" still drops as the stop word "alone", and
/// "(of any race)" yields "any" and "race".
pub fn tokenize(label: &str) -> BTreeSet<String> {
    clean_label(label)
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// `|intersection| / max(|a|, |b|)`, or 0 when either side is empty.
pub fn token_ratio(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let denominator = a.len().max(b.len());
    if denominator == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / denominator as f64
}

fn triggers_for(family: Family) -> &'static [SynonymTrigger] {
    match family {
        Family::Race => RACE_TRIGGERS,
        Family::Gender => GENDER_TRIGGERS,
        _ => &[],
    }
}

fn fired_trigger(
    family: Family,
    target: &BTreeSet<String>,
    candidate: &BTreeSet<String>,
) -> Option<&'static SynonymTrigger> {
    triggers_for(family).iter().find(|t| {
        t.target_terms.iter().any(|term| target.contains(*term))
            && t.candidate_terms.iter().any(|term| candidate.contains(*term))
    })
}

pub(crate) fn best_token_overlap(
    normalizer: &Normalizer,
    family: Family,
    target: &str,
    candidates: &[&str],
) -> Scored {
    if let Some(exact) = exact_canonical(
        normalizer,
        family,
        target,
        candidates,
        MatchStrategy::TokenOverlap,
    ) {
        return exact;
    }

    let target_tokens = tokenize(target);
    let mut best: Option<Scored> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate_tokens = tokenize(candidate);
        let ratio = token_ratio(&target_tokens, &candidate_tokens);

        // A fired hint never scores below its fixed value.
        let scored = match fired_trigger(family, &target_tokens, &candidate_tokens) {
            Some(trigger) if trigger.score >= ratio => Scored {
                index,
                score: trigger.score,
                strategy: MatchStrategy::TokenOverlap,
                basis: MatchBasis::Synonym {
                    trigger: trigger.label.to_string(),
                },
                explanation: format!(
                    "{} variation match (synonym hint, {:.0}% of terms shared)",
                    trigger.label,
                    ratio * 100.0
                ),
            },
            _ => Scored {
                index,
                score: ratio,
                strategy: MatchStrategy::TokenOverlap,
                basis: MatchBasis::TokenRatio { ratio },
                explanation: describe_ratio(ratio),
            },
        };

        if scored.score > 0.0 && best.as_ref().is_none_or(|b| scored.score > b.score) {
            best = Some(scored);
        }
    }

    best.unwrap_or_else(|| Scored {
        index: 0,
        score: FALLBACK_SCORE,
        strategy: MatchStrategy::TokenOverlap,
        basis: MatchBasis::Fallback,
        explanation: format!(
            "Fallback to first available {} option (no terms shared with '{}')",
            family, target
        ),
    })
}

/// A token pick that fell back or scored below [`WEAK_SCORE`].
pub(crate) fn is_weak(scored: &Scored) -> bool {
    scored.basis == MatchBasis::Fallback || scored.score < WEAK_SCORE
}

fn describe_ratio(ratio: f64) -> String {
    let pct = ratio * 100.0;
    if ratio >= 0.6 {
        format!("Strong word overlap match ({:.0}% of terms shared)", pct)
    } else if ratio >= 0.4 {
        format!("Moderate word overlap match ({:.0}% of terms shared)", pct)
    } else {
        format!("Weak word overlap match ({:.0}% of terms shared)", pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(family: Family, target: &str, candidates: &[&str]) -> Scored {
        best_token_overlap(&Normalizer::default(), family, target, candidates)
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_punctuation() {
        let tokens = tokenize("Black or African American Alone");
        let expected: BTreeSet<String> = ["black", "african", "american"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
        assert!(tokenize("Some college, no degree").contains("college"));
        assert!(tokenize("Bachelor's degree").contains("bachelor's"));
    }

    #[test]
    fn test_ratio_uses_larger_side() {
        let a = tokenize("asian indian");
        let b = tokenize("asian");
        assert_eq!(token_ratio(&a, &b), 0.5);
        assert_eq!(token_ratio(&a, &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_gender_synonyms_are_exact() {
        let s = pick(Family::Gender, "Women", &["Male", "Female"]);
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 1.0);
        assert_eq!(s.basis, MatchBasis::Exact);
    }

    #[test]
    fn test_gender_trigger_does_not_confuse_male_and_female() {
        let s = pick(Family::Gender, "Female population", &["Male", "Female"]);
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 0.9);
        assert!(matches!(s.basis, MatchBasis::Synonym { .. }));
    }

    #[test]
    fn test_hispanic_trigger_beats_raw_ratio() {
        let s = pick(
            Family::Race,
            "Spanish speaking residents",
            &["White Alone", "Hispanic or Latino"],
        );
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 0.9);
        assert!(s.explanation.starts_with("Hispanic/Latino variation match"));
    }

    #[test]
    fn test_hispanic_trigger_fires_on_census_origin_label() {
        let s = pick(
            Family::Race,
            "Hispanic or Latino",
            &["Two or more races", "Hispanic or Latino origin (of any race)"],
        );
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 0.9);
        assert_eq!(
            s.basis,
            MatchBasis::Synonym {
                trigger: "Hispanic/Latino".to_string()
            }
        );
        assert!(!is_weak(&s));
    }

    #[test]
    fn test_tokenize_strips_trailing_punctuation() {
        let tokens = tokenize("White alone, not Hispanic or Latino");
        let expected: BTreeSet<String> = ["white", "hispanic", "latino"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
        assert!(tokenize("Hispanic or Latino origin (of any race)").contains("race"));
    }

    #[test]
    fn test_raw_ratio_when_no_trigger() {
        let s = pick(
            Family::Profession,
            "Arts and media occupations",
            &["Service occupations", "Arts, design, entertainment, sports, and media occupations"],
        );
        assert_eq!(s.index, 1);
        assert!(matches!(s.basis, MatchBasis::TokenRatio { .. }));
        assert!(s.score > 0.0 && s.score < 1.0);
    }

    #[test]
    fn test_fallback_to_first_candidate() {
        let s = pick(Family::Gender, "Nonbinary", &["Male", "Female"]);
        assert_eq!(s.index, 0);
        assert_eq!(s.score, FALLBACK_SCORE);
        assert_eq!(s.basis, MatchBasis::Fallback);
        assert!(s.explanation.contains("Fallback"));
        assert!(is_weak(&s));
    }
}
