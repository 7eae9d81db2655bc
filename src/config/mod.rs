//! # Configuration
//!
//! Scheduler and logging settings, layered from built-in defaults, optional
//! TOML files and `CLUSTER_ACTION__*` environment variables by [`ConfigManager`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cluster_action_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let poll_interval = manager.config().scheduler.poll_interval();
//! let action_timeout = manager.config().scheduler.action_timeout();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::constants::system;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterActionConfig {
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

impl ClusterActionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.scheduler.validate()
    }
}

/// Action scheduler tunables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Sleep between scheduler ticks
    pub poll_interval_ms: u64,
    /// Time allowed for each attempt of a host role command
    pub action_timeout_ms: u64,
    /// How long `shutdown` waits for the loop to wind down
    pub stop_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: system::DEFAULT_POLL_INTERVAL_MS,
            action_timeout_ms: system::DEFAULT_ACTION_TIMEOUT_MS,
            stop_timeout_ms: system::DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("scheduler.poll_interval_ms", self.poll_interval_ms),
            ("scheduler.action_timeout_ms", self.action_timeout_ms),
            ("scheduler.stop_timeout_ms", self.stop_timeout_ms),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(field, "must be greater than 0"));
            }
        }

        // Expiry arithmetic runs in signed epoch millis
        if i64::try_from(self.action_timeout_ms)
            .ok()
            .and_then(|timeout| timeout.checked_mul(system::MAX_ATTEMPTS))
            .is_none()
        {
            return Err(ConfigurationError::invalid_value(
                "scheduler.action_timeout_ms",
                "too large",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; derived from the environment when unset
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LoggingConfig {
    pub fn effective_level(&self, environment: &str) -> String {
        self.level
            .clone()
            .unwrap_or_else(|| default_log_level(environment).to_string())
    }
}

/// Current environment: CLUSTER_ACTION_ENV || APP_ENV || 'development'
pub fn detect_environment() -> String {
    env::var("CLUSTER_ACTION_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Log level based on environment
pub fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
