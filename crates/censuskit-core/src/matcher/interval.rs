//! Interval-overlap matching for numeric bracket families.

use crate::category::{Family, Interval, Normalizer};

use super::{MatchBasis, MatchStrategy, Scored};

/// Fraction of `target` covered by `candidate`, in `[0, 1]`.
///
/// This is coverage of the target, not Jaccard similarity: a narrow target
/// fully inside a wide candidate scores 1.0. A zero-width target scores 1.0
/// when its point lies inside the candidate and 0.0 otherwise.
pub fn coverage(target: &Interval, candidate: &Interval) -> f64 {
    if target.is_empty() {
        return if candidate.contains_point(target.low) {
            1.0
        } else {
            0.0
        };
    }
    (target.overlap(candidate) / target.len()).clamp(0.0, 1.0)
}

pub(crate) fn best_overlap(
    normalizer: &Normalizer,
    family: Family,
    target: &str,
    candidates: &[&str],
) -> Scored {
    let target_interval = normalizer.interval_of(family, target);
    let intervals: Vec<Interval> = candidates
        .iter()
        .map(|c| normalizer.interval_of(family, c))
        .collect();

    // Strictly greater keeps the first-listed candidate on ties.
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in intervals.iter().enumerate() {
        let cov = coverage(&target_interval, candidate);
        if cov > 0.0 && best.is_none_or(|(_, b)| cov > b) {
            best = Some((idx, cov));
        }
    }

    if let Some((index, cov)) = best {
        return Scored {
            index,
            score: cov,
            strategy: MatchStrategy::IntervalOverlap,
            basis: MatchBasis::Coverage { coverage: cov },
            explanation: describe_coverage(cov),
        };
    }

    let target_mid = target_interval.midpoint();
    let mut index = 0;
    let mut closest = f64::INFINITY;
    for (idx, candidate) in intervals.iter().enumerate() {
        let distance = (candidate.midpoint() - target_mid).abs();
        if distance < closest {
            closest = distance;
            index = idx;
        }
    }

    Scored {
        index,
        score: 0.0,
        strategy: MatchStrategy::IntervalOverlap,
        basis: MatchBasis::NearestMidpoint { distance: closest },
        explanation: format!(
            "closest available range (no overlap), midpoints {} apart",
            format_amount(closest)
        ),
    }
}

fn describe_coverage(cov: f64) -> String {
    let pct = cov * 100.0;
    if cov >= 0.95 {
        format!("Exact match (covers {:.0}% of target range)", pct)
    } else if cov >= 0.8 {
        format!("Very close match (covers {:.0}% of target range)", pct)
    } else if cov >= 0.5 {
        format!("Partial match (covers {:.0}% of target range)", pct)
    } else {
        format!("Limited overlap (covers {:.0}% of target range)", pct)
    }
}

fn format_amount(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{:.0}", x)
    } else {
        format!("{:.1}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(family: Family, target: &str, candidates: &[&str]) -> Scored {
        best_overlap(&Normalizer::default(), family, target, candidates)
    }

    #[test]
    fn test_full_containment_scores_one() {
        let s = pick(
            Family::Age,
            "30 to 40 years",
            &["Under 25 years", "25 to 44 years", "45 to 64 years"],
        );
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 1.0);
        assert!(s.explanation.starts_with("Exact match"));
    }

    #[test]
    fn test_partial_overlap_prefers_larger_coverage() {
        // [30,40] vs [25,34] covers 4/10, vs [35,44] covers 5/10.
        let s = pick(
            Family::Age,
            "30 to 40 years",
            &["25 to 34 years", "35 to 44 years"],
        );
        assert_eq!(s.index, 1);
        assert!((s.score - 0.5).abs() < 1e-12);
        assert!(s.explanation.contains("50%"));
    }

    #[test]
    fn test_asymmetric_coverage() {
        let narrow = Interval::new(30.0, 34.0);
        let wide = Interval::new(25.0, 44.0);
        assert_eq!(coverage(&narrow, &wide), 1.0);
        assert!(coverage(&wide, &narrow) < 1.0);
    }

    #[test]
    fn test_ties_go_to_first_listed() {
        let s = pick(
            Family::Age,
            "30 to 34 years",
            &["25 to 44 years", "30 to 34 years"],
        );
        assert_eq!(s.index, 0);
        assert_eq!(s.score, 1.0);
    }

    #[test]
    fn test_no_overlap_falls_back_to_nearest_midpoint() {
        let s = pick(
            Family::Age,
            "Under 5 years",
            &["18 to 24 years", "25 to 34 years", "65 years and over"],
        );
        assert_eq!(s.index, 0);
        assert_eq!(s.score, 0.0);
        assert!(s.explanation.starts_with("closest available range (no overlap)"));
        assert!(matches!(s.basis, MatchBasis::NearestMidpoint { .. }));
    }

    #[test]
    fn test_income_open_ended_target() {
        let s = pick(
            Family::Income,
            "$200,000 or more",
            &["$50,000 to $99,999", "$100,000 or more"],
        );
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 1.0);
    }

    #[test]
    fn test_zero_width_target_inside_candidate() {
        let s = pick(
            Family::Income,
            "$40,000",
            &["$25,000 to $34,999", "$35,000 to $49,999"],
        );
        assert_eq!(s.index, 1);
        assert_eq!(s.score, 1.0);
    }

    #[test]
    fn test_coverage_is_bounded() {
        let targets = [
            Interval::new(0.0, 5.0),
            Interval::new(25.0, 34.0),
            Interval::new(85.0, 120.0),
            Interval::new(10.0, 10.0),
        ];
        let candidates = [
            Interval::new(0.0, 120.0),
            Interval::new(20.0, 30.0),
            Interval::new(40.0, 50.0),
            Interval::new(10.0, 10.0),
        ];
        for t in &targets {
            for c in &candidates {
                let cov = coverage(t, c);
                assert!((0.0..=1.0).contains(&cov));
                assert_eq!(cov == 1.0, c.contains(t), "{:?} in {:?}", t, c);
            }
        }
    }
}
