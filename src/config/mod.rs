//! Configuration module for the table renderer service
//!
//! This module provides the `ServiceConfig` struct and its loader, which
//! reads overrides from environment variables on top of sensible defaults.

pub mod types;

pub use types::ServiceConfig;

use std::time::Duration;
use thiserror::Error;

/// Environment variable names
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const HOST: &str = "HOST";
pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "SHUTDOWN_TIMEOUT_SECS";
pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be used
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ServiceConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but unusable.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset or empty variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but unusable.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(BIND_ADDR) {
            config.bind_addr = normalize_bind_addr(value.trim());
        }
        if let Some(value) = get(HOST) {
            config.host = value.trim().to_string();
        }
        if let Some(value) = get(CORS_ALLOWED_ORIGINS) {
            config.cors_allowed_origins = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = get(SHUTDOWN_TIMEOUT_SECS) {
            let seconds = value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: SHUTDOWN_TIMEOUT_SECS,
                value: value.clone(),
                reason: e.to_string(),
            })?;
            config.shutdown_timeout = Duration::from_secs(seconds);
        }
        if let Some(value) = get(MAX_BODY_BYTES) {
            let bytes = value.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                key: MAX_BODY_BYTES,
                value: value.clone(),
                reason: e.to_string(),
            })?;
            if bytes == 0 {
                return Err(ConfigError::InvalidValue {
                    key: MAX_BODY_BYTES,
                    value,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.max_body_bytes = bytes;
        }

        Ok(config)
    }
}

/// A bare `:port` binds every interface
fn normalize_bind_addr(value: &str) -> String {
    if value.starts_with(':') {
        format!("0.0.0.0{value}")
    } else {
        value.to_string()
    }
}
