//! Delegated property comparison
//!
//! Some providers normalize values before comparing them (case-insensitive
//! hostnames, canonical TXT quoting). The engine asks the plugin instead of
//! comparing strings itself.

use serde::{Deserialize, Serialize};

/// Body of a property comparison request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyComparisonRequest {
    /// Property name
    pub name: String,
    /// Value currently held by the provider
    pub previous: String,
    /// Desired value
    pub current: String,
}

impl PropertyComparisonRequest {
    /// Create a comparison request
    pub fn new(
        name: impl Into<String>,
        previous: impl Into<String>,
        current: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            previous: previous.into(),
            current: current.into(),
        }
    }
}

/// Body of a property comparison reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyComparisonResponse {
    /// Whether the plugin considers both values equal
    pub equals: bool,
}
