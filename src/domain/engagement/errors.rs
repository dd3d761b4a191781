//! Error types for the engagement domain

/// Engagement policy construction errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum PolicyError {
    #[error("Threshold {name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("Cautious threshold {cautious} exceeds aggressive threshold {aggressive}")]
    ThresholdsInverted { cautious: f64, aggressive: f64 },

    #[error("Limit {0} must be greater than zero")]
    ZeroLimit(&'static str),
}
