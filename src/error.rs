//! Error types for the premium pipeline

use thiserror::Error;

/// Pipeline error.
///
/// Every stage reports its own failures and callers propagate them unchanged.
/// An all-zero loss sample is not an error: it yields a degenerate curve
/// (see [`crate::curve::EpCurve::is_degenerate`]) and zero loss statistics.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Loss sample, curve, attachment point or payout is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rate parameters or sampler parameters are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Reading a sample or parameter file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Loss sample CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Parameter JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        PricingError::InvalidInput(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PricingError::InvalidConfiguration(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PricingError>;
