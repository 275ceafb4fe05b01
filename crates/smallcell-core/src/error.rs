//! Error type for fatal input failures.
//!
//! Out-of-domain model inputs are not errors: they surface as warnings on
//! the results (see [`crate::validate`]). Everything here aborts the
//! request that produced it and nothing else.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AdvisorError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid config TOML: {0}")]
    ConfigParse(String),
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("target probability {0} must lie strictly between 0 and 1")]
    InvalidProbability(f64),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("power must be positive (got {0})")]
    NonPositivePower(f64),
}

impl AdvisorError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
