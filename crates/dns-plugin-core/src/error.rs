//! Error types for the DNS plugin adapter
//!
//! This module defines all error types used throughout the workspace, plus
//! the coarse [`FailureKind`] classification used to decide whether a failed
//! operation is surfaced or absorbed.

use thiserror::Error;

/// Result type alias for plugin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS plugin adapter
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The plugin did not advertise the expected media type and version
    #[error("Configuration error: plugin negotiation failed: {0}")]
    Negotiation(String),

    /// Transport errors reaching the plugin
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request deadline elapsed before a response arrived
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The caller cancelled the operation
    #[error("Request cancelled")]
    Cancelled,

    /// The plugin answered with a non-success status
    #[error("failed to {action} with code {status}")]
    RemoteStatus {
        /// What the adapter was trying to do ("get records", "apply changes", ...)
        action: &'static str,
        /// Numeric HTTP status returned by the plugin
        status: u16,
    },

    /// JSON serialization/deserialization errors
    ///
    /// Displays the underlying parse error verbatim.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad local configuration or input
    Configuration,
    /// Content negotiation with the plugin failed
    Negotiation,
    /// The plugin could not be reached in time (includes timeouts and cancellation)
    Transport,
    /// The plugin replied with a non-success status
    RemoteStatus,
    /// The reply body did not match the expected shape
    Decode,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Negotiation => "negotiation",
            FailureKind::Transport => "transport",
            FailureKind::RemoteStatus => "remote status",
            FailureKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a negotiation error
    pub fn negotiation(msg: impl Into<String>) -> Self {
        Self::Negotiation(msg.into())
    }

    /// Create an HTTP (transport) error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a remote status error
    pub fn remote_status(action: &'static str, status: u16) -> Self {
        Self::RemoteStatus { action, status }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Config(_) | Error::InvalidInput(_) => FailureKind::Configuration,
            Error::Negotiation(_) => FailureKind::Negotiation,
            Error::Http(_) | Error::Timeout(_) | Error::Cancelled => FailureKind::Transport,
            Error::RemoteStatus { .. } => FailureKind::RemoteStatus,
            Error::Json(_) => FailureKind::Decode,
        }
    }

    /// The HTTP status carried by a [`Error::RemoteStatus`], if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
