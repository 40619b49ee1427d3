//! Core configuration types for the service
//!
//! This module contains the `ServiceConfig` struct that defines the listener,
//! CORS and lifecycle parameters of the HTTP service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration struct for the table renderer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the listener binds to
    pub bind_addr: String,

    /// Externally visible base URL, used only for logging
    pub host: String,

    /// Origins allowed by CORS; `*` allows any origin
    pub cors_allowed_origins: Vec<String>,

    /// How long in-flight requests may run after a shutdown signal
    ///
    /// Default: 5 seconds
    pub shutdown_timeout: Duration,

    /// Largest request body accepted, in bytes
    ///
    /// Default: 10 MiB
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:23100".to_string(),
            host: "http://localhost:23100".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            shutdown_timeout: Duration::from_secs(5),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Whether CORS should allow every origin
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}
