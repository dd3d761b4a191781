//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("{0} must be within [0, 1]")]
    ThresholdOutOfRange(&'static str),

    #[error("cautious_threshold exceeds aggressive_threshold")]
    ThresholdsInverted,

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("Temperature must be within [0, 2]")]
    InvalidTemperature,

    #[error("Invalid request timeout")]
    InvalidTimeout,
}
