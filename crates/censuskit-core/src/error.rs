//! # Error Types
//!
//! Defines `CensusKitError`, the unified error enum for every failure mode in
//! the CensusKit engine. Unparseable category labels are deliberately absent:
//! the normalizer resolves them to safe defaults instead of failing. What
//! remains are programmer-level misuse (empty candidate lists, mixed
//! families), malformed tables, and provider/configuration failures.

use thiserror::Error;

use crate::category::Family;

/// All errors that can occur in CensusKit operations.
#[derive(Error, Debug)]
pub enum CensusKitError {
    #[error("No candidate {family} categories to match '{target}' against\n  The matcher needs at least one candidate value from the table axis")]
    NoCandidates { family: Family, target: String },

    #[error("Candidate '{label}' belongs to family {found}, but the target '{target}' is {expected}\n  Values are only comparable within one family")]
    FamilyMismatch {
        target: String,
        label: String,
        expected: Family,
        found: Family,
    },

    #[error("Invalid joint table: {message}")]
    InvalidTable { message: String },

    #[error("Table '{source_id}' has no {family} axis (axes are {family_a} × {family_b})")]
    MissingAxis {
        source_id: String,
        family: Family,
        family_a: Family,
        family_b: Family,
    },

    #[error("Table provider failed for source '{source_id}': {message}")]
    Provider { source_id: String, message: String },

    #[error("No table registered for source '{source_id}'")]
    SourceNotFound { source_id: String },

    #[error("Source id '{source_id}' is registered more than once; only the first registration is evaluated")]
    DuplicateSource { source_id: String },

    #[error("Unknown category family '{name}'. Supported: age, income, education, profession, race, gender")]
    UnknownFamily { name: String },

    #[error("Unknown table dimension '{name}'. Use 'a' or 'b'")]
    UnknownDimension { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {message}: {source}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CensusKitError>;
