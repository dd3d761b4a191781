//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `HONEYPOT` prefix and
//! nested values are separated by double underscores. Every value has a
//! default, so an empty environment yields a working configuration.
//!
//! # Example
//!
//! ```no_run
//! use honeypot_engagement::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Primary model: {}", config.ai.primary_model);
//! ```

mod ai;
mod engagement;
mod error;

pub use ai::AiConfig;
pub use engagement::EngagementConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Routing thresholds and engagement budgets
    #[serde(default)]
    pub engagement: EngagementConfig,

    /// Text-generation models and sampling
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HONEYPOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HONEYPOT__ENGAGEMENT__MAX_TURNS_CAUTIOUS=12` -> `engagement.max_turns_cautious = 12`
    /// - `HONEYPOT__AI__PRIMARY_MODEL=...` -> `ai.primary_model = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HONEYPOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engagement.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
