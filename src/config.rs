//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub notifications: NotificationConfig,
    pub reporting: ReportingConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

/// Generative-AI collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key; when absent the offline generator is used and every
    /// request resolves to the documented fallback text
    pub api_key: Option<String>,
    /// Model name (e.g., "gemini-2.5-flash")
    pub model: String,
    /// REST base URL of the generative language API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Notification and toast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Toast auto-dismiss interval in milliseconds (default: 3000)
    pub toast_duration_ms: u64,
}

impl NotificationConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 3000,
        }
    }
}

/// Report submission configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Simulated network delay before a report is handed to the store
    pub submit_delay_ms: u64,
    /// Descriptions must be longer than this to get an automatic advisory
    pub min_description_for_advisory: usize,
    /// Location pre-filled in new report drafts
    pub default_location: String,
}

impl ReportingConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1000,
            min_description_for_advisory: 5,
            default_location: "Jl. Merpati No. 4, RT 05".to_string(),
        }
    }
}

/// Demo dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Start sessions from the bundled demo dataset
    pub enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (NEIGHBORWATCH__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Environment, File};

        let config = Self::builder_with_defaults()?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (NEIGHBORWATCH__*)
            .add_source(
                Environment::with_prefix("NEIGHBORWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        Self::finish(config)
    }

    /// Load configuration from a single file on top of the defaults
    ///
    /// Used by embedders that keep their settings outside `config/`.
    pub fn load_from(path: &Path) -> Result<Self, crate::error::AppError> {
        use config::File;

        let config = Self::builder_with_defaults()?
            .add_source(File::from(path))
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        Self::finish(config)
    }

    /// Built-in defaults only, without touching files or the environment
    pub fn defaults() -> Result<Self, crate::error::AppError> {
        let config = Self::builder_with_defaults()?
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        Self::finish(config)
    }

    fn builder_with_defaults()
    -> Result<config::ConfigBuilder<config::builder::DefaultState>, crate::error::AppError> {
        let reporting = ReportingConfig::default();

        Ok(config::Config::builder()
            .set_default("ai.model", "gemini-2.5-flash")?
            .set_default(
                "ai.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("ai.timeout_seconds", 30)?
            .set_default("notifications.toast_duration_ms", 3000)?
            .set_default("reporting.submit_delay_ms", reporting.submit_delay_ms)?
            .set_default(
                "reporting.min_description_for_advisory",
                reporting.min_description_for_advisory as u64,
            )?
            .set_default("reporting.default_location", reporting.default_location)?
            .set_default("seed.enabled", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?)
    }

    fn finish(config: config::Config) -> Result<Self, crate::error::AppError> {
        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.notifications.toast_duration_ms == 0 {
            return Err(crate::error::AppError::Config(
                "notifications.toast_duration_ms must be greater than 0".to_string(),
            ));
        }

        if self.ai.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "ai.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if let Err(error) = url::Url::parse(&self.ai.base_url) {
            return Err(crate::error::AppError::Config(format!(
                "ai.base_url is not a valid URL: {}",
                error
            )));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        if self.ai.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            tracing::warn!("ai.api_key is not set; AI advice will use fallback text");
        }

        Ok(())
    }
}
