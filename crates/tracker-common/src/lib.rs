//! # tracker-common
//!
//! Shared utilities: configuration loading and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{AppConfig, AppSettings, ConfigError, Environment, RateLimitConfig, SyncConfig};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
