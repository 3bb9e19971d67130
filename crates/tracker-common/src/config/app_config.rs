//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub sync: SyncConfig,
    pub rate_limit: RateLimitConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Periodic reconciliation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Seconds between full reconciliation passes
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Outbound rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Permits per window
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// Window length in seconds
    #[serde(default = "default_per_secs")]
    pub per_secs: u64,
}

impl RateLimitConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.per_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "invite-tracker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_sync_interval() -> u64 {
    600 // 10 minutes
}

fn default_rate() -> u32 {
    2
}

fn default_per_secs() -> u64 {
    8
}

impl AppConfig {
    /// Telemetry settings appropriate for the configured environment
    #[must_use]
    pub fn tracing(&self) -> crate::telemetry::TracingConfig {
        if self.app.env.is_production() {
            crate::telemetry::TracingConfig::production()
        } else {
            crate::telemetry::TracingConfig::development()
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparseable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            sync: SyncConfig {
                interval_secs: parse_var("SYNC_INTERVAL_SECS", default_sync_interval())?,
            },
            rate_limit: RateLimitConfig {
                rate: parse_var("RATE_LIMIT_RATE", default_rate())?,
                per_secs: parse_var("RATE_LIMIT_PER_SECS", default_per_secs())?,
            },
        })
    }
}

/// Parse an optional environment variable, falling back to a default
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
