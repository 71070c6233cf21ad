//! Conditional distributions: fix one axis to an exact label, then
//! marginalize and normalize the other.

use serde::{Deserialize, Serialize};

use crate::category::CategoryValue;

use super::{
    group_counts, saturating_total, to_rows, Dimension, DistributionRow, JointDistributionTable,
};

/// The distribution of one axis given a fixed value on the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalDistribution {
    pub condition: CategoryValue,
    /// Axis the distribution is over (the one not conditioned on).
    pub dimension: Dimension,
    pub data: Vec<DistributionRow>,
    pub total: u64,
    /// Citation of the table the distribution came from.
    pub data_source: String,
}

impl ConditionalDistribution {
    /// True when no cells matched the condition or they summed to zero.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Distribution over the other axis of `table`, given `dimension == label`.
///
/// Equality is exact: fuzzy resolution must happen through the matcher
/// beforehand. A label absent from the table and a label whose cells all
/// hold zero both give an empty `data` with `total = 0`; use
/// [`JointDistributionTable::contains`] to tell them apart.
pub fn condition_on(
    table: &JointDistributionTable,
    dimension: Dimension,
    label: &str,
) -> ConditionalDistribution {
    let other = dimension.other();
    let rows = group_counts(
        table.family(other),
        table
            .cells()
            .iter()
            .filter(|c| c.label(dimension) == label)
            .map(|c| (c.label(other), c.count)),
    );
    let total = saturating_total(rows.iter().map(|(_, v)| *v));

    ConditionalDistribution {
        condition: CategoryValue::new(table.family(dimension), label),
        dimension: other,
        data: if total > 0 {
            to_rows(rows, total)
        } else {
            Vec::new()
        },
        total,
        data_source: table.source().to_string(),
    }
}
