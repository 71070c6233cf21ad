pub mod category;
pub mod config;
pub mod error;
pub mod matcher;
pub mod query;
pub mod table;

// Re-export key types for convenience
pub use category::{CategoryValue, Family, Normalizer, OpenBounds};
pub use error::{CensusKitError, Result};
pub use matcher::{build_crosswalk, Crosswalk, MatchResult, Matcher};
pub use query::{
    reconcile_and_condition, QueryContext, QueryEngine, SourceRegistration, SourceSpec,
    TableProvider, UnifiedResult,
};
pub use table::{condition_on, ConditionalDistribution, Dimension, JointDistributionTable};
