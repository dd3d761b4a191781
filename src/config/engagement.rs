//! Engagement policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::engagement::PolicyThresholds;

/// Routing thresholds and engagement budgets
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngagementConfig {
    /// Minimum detector confidence to engage cautiously
    #[serde(default = "default_cautious_threshold")]
    pub cautious_threshold: f64,

    /// Minimum detector confidence to engage aggressively
    #[serde(default = "default_aggressive_threshold")]
    pub aggressive_threshold: f64,

    #[serde(default = "default_max_turns_cautious")]
    pub max_turns_cautious: u32,

    #[serde(default = "default_max_turns_aggressive")]
    pub max_turns_aggressive: u32,

    /// Wall-clock budget per conversation, in seconds
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Turns without new intelligence before giving up
    #[serde(default = "default_stale_turn_threshold")]
    pub stale_turn_threshold: u32,
}

impl EngagementConfig {
    /// Thresholds in the form the policy consumes
    pub fn thresholds(&self) -> PolicyThresholds {
        PolicyThresholds {
            cautious_threshold: self.cautious_threshold,
            aggressive_threshold: self.aggressive_threshold,
            max_turns_cautious: self.max_turns_cautious,
            max_turns_aggressive: self.max_turns_aggressive,
            max_duration_secs: self.max_duration_secs,
            stale_turn_threshold: self.stale_turn_threshold,
        }
    }

    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.cautious_threshold) {
            return Err(ValidationError::ThresholdOutOfRange("cautious_threshold"));
        }
        if !(0.0..=1.0).contains(&self.aggressive_threshold) {
            return Err(ValidationError::ThresholdOutOfRange("aggressive_threshold"));
        }
        if self.cautious_threshold > self.aggressive_threshold {
            return Err(ValidationError::ThresholdsInverted);
        }
        if self.max_turns_cautious == 0 {
            return Err(ValidationError::ZeroLimit("max_turns_cautious"));
        }
        if self.max_turns_aggressive == 0 {
            return Err(ValidationError::ZeroLimit("max_turns_aggressive"));
        }
        if self.max_duration_secs == 0 {
            return Err(ValidationError::ZeroLimit("max_duration_secs"));
        }
        if self.stale_turn_threshold == 0 {
            return Err(ValidationError::ZeroLimit("stale_turn_threshold"));
        }
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            cautious_threshold: default_cautious_threshold(),
            aggressive_threshold: default_aggressive_threshold(),
            max_turns_cautious: default_max_turns_cautious(),
            max_turns_aggressive: default_max_turns_aggressive(),
            max_duration_secs: default_max_duration_secs(),
            stale_turn_threshold: default_stale_turn_threshold(),
        }
    }
}

fn default_cautious_threshold() -> f64 {
    0.60
}

fn default_aggressive_threshold() -> f64 {
    0.85
}

fn default_max_turns_cautious() -> u32 {
    10
}

fn default_max_turns_aggressive() -> u32 {
    25
}

fn default_max_duration_secs() -> u64 {
    600
}

fn default_stale_turn_threshold() -> u32 {
    5
}
