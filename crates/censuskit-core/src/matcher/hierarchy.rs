//! Hierarchy-distance matching for ordinal families.

use crate::category::{Family, Normalizer};

use super::{MatchBasis, MatchStrategy, Scored};

/// Score for a given index distance in a family hierarchy.
pub fn distance_score(distance: usize) -> f64 {
    match distance {
        0 => 1.0,
        1 => 0.8,
        2 => 0.6,
        _ => 0.4,
    }
}

/// Exact canonical match, else nearest hierarchy position.
///
/// Returns `None` when the target is outside the family hierarchy or no
/// candidate is inside it; the caller then falls back to token overlap.
pub(crate) fn best_in_hierarchy(
    normalizer: &Normalizer,
    family: Family,
    target: &str,
    candidates: &[&str],
) -> Option<Scored> {
    if let Some(exact) = exact_canonical(
        normalizer,
        family,
        target,
        candidates,
        MatchStrategy::HierarchyDistance,
    ) {
        return Some(exact);
    }

    let target_idx = normalizer.hierarchy_index(family, target)?;

    let mut best: Option<(usize, usize)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let Some(candidate_idx) = normalizer.hierarchy_index(family, candidate) else {
            continue;
        };
        let distance = target_idx.abs_diff(candidate_idx);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }

    let (index, distance) = best?;
    let explanation = match distance {
        0 => format!("Exact hierarchical {} match", family),
        1 => format!("Adjacent {} level (hierarchy distance: 1)", family),
        2 => format!("Similar {} category (hierarchy distance: 2)", family),
        d => format!("Different {} category (hierarchy distance: {})", family, d),
    };

    Some(Scored {
        index,
        score: distance_score(distance),
        strategy: MatchStrategy::HierarchyDistance,
        basis: MatchBasis::HierarchyDistance { distance },
        explanation,
    })
}

/// First candidate whose canonical form equals the target's.
pub(crate) fn exact_canonical(
    normalizer: &Normalizer,
    family: Family,
    target: &str,
    candidates: &[&str],
    strategy: MatchStrategy,
) -> Option<Scored> {
    let target_key = normalizer.canonical(family, target);
    candidates
        .iter()
        .position(|c| normalizer.canonical(family, c) == target_key)
        .map(|index| Scored {
            index,
            score: 1.0,
            strategy,
            basis: MatchBasis::Exact,
            explanation: format!("Exact {} match (canonical form '{}')", family, target_key),
        })
}
