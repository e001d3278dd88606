//! Error types for zzcore
//!
//! Everything in here is a configuration error: it is raised while a job is
//! being set up and never while events are processed.

use thiserror::Error;

/// zzcore error type
#[derive(Error, Debug)]
pub enum Error {
    /// Selection setup name not known
    #[error("unknown selection setup '{0}' (expected one of: allCutsAtOnce, allCutsAtOnceButMZ2, allCutsAtOncePlusMZb, allCutsAtOncePlusSmart)")]
    UnknownSelectionSetup(String),

    /// Selection setup known but no longer supported
    #[error("selection setup '{0}' is no longer supported")]
    DeprecatedSelectionSetup(String),

    /// Best candidate comparator name not known
    #[error("unknown best candidate comparator '{0}'")]
    UnknownComparator(String),

    /// Secondary comparator key not known
    #[error("unknown secondary comparator key '{0}'")]
    UnknownSecondaryKey(String),

    /// No constants registered for the requested run period
    #[error("no constants defined for run period '{0}'")]
    MissingRunPeriod(String),

    /// A constant has a value the engine cannot work with
    #[error("invalid constant {name} = {value} for run period '{period}'")]
    InvalidConstant {
        period: String,
        name: &'static str,
        value: f64,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
