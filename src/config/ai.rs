//! Text-generation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model selection and sampling parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AiConfig {
    /// Model tried first
    #[serde(default = "default_primary_model")]
    pub primary_model: String,

    /// Model tried when the primary fails; empty disables failover
    #[serde(default = "default_fallback_model")]
    pub fallback_model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fallback model, if one is configured
    pub fn fallback_model(&self) -> Option<&str> {
        self.fallback_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Models in the order they are tried
    pub fn model_chain(&self) -> Vec<&str> {
        let mut chain = vec![self.primary_model.as_str()];
        chain.extend(self.fallback_model());
        chain
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.primary_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PRIMARY_MODEL"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_output_tokens == 0 {
            return Err(ValidationError::ZeroLimit("max_output_tokens"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_primary_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_fallback_model() -> Option<String> {
    Some("gemini-2.5-pro".to_string())
}

fn default_temperature() -> f32 {
    0.9
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_timeout() -> u64 {
    30
}
