//! Error types for the mining engine

use thiserror::Error;

/// Errors raised while configuring or running the miner
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiningError {
    #[error("Dataset is empty: at least one transaction is required")]
    DatasetEmpty,

    #[error("Invalid threshold: {name} must be in [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Miner not configured: {0} has not been set")]
    NotConfigured(&'static str),

    #[error("Invalid input schema: missing column '{column}' (available: {available:?})")]
    InvalidInputSchema {
        column: String,
        available: Vec<String>,
    },

    #[error("Malformed table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MiningError>;

/// Reject thresholds outside `[0, 1]` (NaN included)
pub(crate) fn check_threshold(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(MiningError::InvalidThreshold { name, value })
    }
}
