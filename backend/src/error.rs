//! Error types for event generation and aggregation.
//!
//! All validation happens before the first random draw, so a `ConfigError`
//! always means nothing was generated.

use thiserror::Error;

/// Invalid or missing run parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weeks must be positive, got {0}")]
    NonPositiveWeeks(i64),

    #[error("malformed date '{0}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    MalformedDate(String),

    #[error("malformed bucket width '{0}': expected <integer><minute|hour|day|week>")]
    MalformedBucketWidth(String),

    #[error("{name} distribution has no categories")]
    EmptyDistribution { name: &'static str },

    #[error("{name} distribution has zero total weight")]
    ZeroTotalWeight { name: &'static str },

    #[error("{name} weight at index {index} is {weight}; weights must be finite and non-negative")]
    InvalidWeight {
        name: &'static str,
        index: usize,
        weight: f64,
    },

    #[error("{name} distribution needs {expected} weights, got {actual}")]
    WrongCardinality {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid range: {field} end {end} is not after start {start}")]
    InvalidRange {
        field: &'static str,
        start: String,
        end: String,
    },

    #[error("aggregation needs {count} buckets, more than the limit of {limit}; use a wider bucket or a shorter range")]
    TooManyBuckets { count: u64, limit: u64 },

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
}

/// Top-level error for library operations.
#[derive(Debug, Error)]
pub enum TimeshapeError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TimeshapeError {
    fn from(err: serde_json::Error) -> Self {
        TimeshapeError::Serialization(err.to_string())
    }
}
