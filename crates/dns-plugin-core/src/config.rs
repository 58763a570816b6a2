//! Configuration types for the DNS plugin adapter
//!
//! This module defines the connection settings for a plugin server.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plugin connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Base URL of the plugin server (e.g., "http://localhost:8888")
    pub url: String,

    /// Deadline for each operation request (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Deadline for the negotiation probe at construction (in seconds)
    #[serde(default = "default_negotiation_timeout_secs")]
    pub negotiation_timeout_secs: u64,
}

impl PluginConfig {
    /// Create a new configuration with default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            negotiation_timeout_secs: default_negotiation_timeout_secs(),
        }
    }

    /// Set the per-request deadline
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the negotiation deadline
    pub fn with_negotiation_timeout_secs(mut self, secs: u64) -> Self {
        self.negotiation_timeout_secs = secs;
        self
    }

    /// Per-request deadline as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Negotiation deadline as a [`Duration`]
    pub fn negotiation_timeout(&self) -> Duration {
        Duration::from_secs(self.negotiation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.trim().is_empty() {
            return Err(crate::Error::config("Plugin URL cannot be empty"));
        }

        let scheme = self.url.trim().split_once("://").map(|(scheme, _)| scheme);
        let is_http = scheme.is_some_and(|scheme| {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        });
        if !is_http {
            return Err(crate::Error::config(format!(
                "Plugin URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Plugin request timeout must be > 0"));
        }

        if self.negotiation_timeout_secs == 0 {
            return Err(crate::Error::config("Plugin negotiation timeout must be > 0"));
        }

        Ok(())
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_negotiation_timeout_secs() -> u64 {
    10
}
