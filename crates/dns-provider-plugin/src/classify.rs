//! Failure classification and per-operation policies
//!
//! Every failed exchange ends up as a [`dns_plugin_core::Error`]. Whether it
//! reaches the caller depends on the operation:
//!
//! - `Propagate`: records, apply changes
//! - `FailOpen`: property comparison (answers "equal")
//! - `FailClosed`: endpoint adjustment (answers "no endpoints")

use dns_plugin_core::{Error, Result};

/// The four remote operations of the plugin contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /records`
    Records,
    /// `POST /records`
    ApplyChanges,
    /// `POST /propertyvaluesequal`
    PropertyValuesEqual,
    /// `POST /adjustendpoints`
    AdjustEndpoints,
}

/// What happens to a failure of a given operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller
    Propagate,
    /// Swallow the error and report a permissive default
    FailOpen,
    /// Swallow the error and report a restrictive default
    FailClosed,
}

impl Operation {
    /// Verb phrase used in status error messages
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Records => "get records",
            Operation::ApplyChanges => "apply changes",
            Operation::PropertyValuesEqual => "compare property values",
            Operation::AdjustEndpoints => "adjust endpoints",
        }
    }

    /// Resource path relative to the plugin base URL
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Records | Operation::ApplyChanges => "records",
            Operation::PropertyValuesEqual => "propertyvaluesequal",
            Operation::AdjustEndpoints => "adjustendpoints",
        }
    }

    /// Failure policy for this operation
    pub fn policy(&self) -> FailurePolicy {
        match self {
            Operation::Records | Operation::ApplyChanges => FailurePolicy::Propagate,
            Operation::PropertyValuesEqual => FailurePolicy::FailOpen,
            Operation::AdjustEndpoints => FailurePolicy::FailClosed,
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailurePolicy::Propagate => "propagate",
            FailurePolicy::FailOpen => "fail-open",
            FailurePolicy::FailClosed => "fail-closed",
        };
        f.write_str(name)
    }
}

/// Map a transport error from the HTTP client
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(err.to_string())
    } else {
        Error::http(err.to_string())
    }
}

/// Resolve a non-propagating operation's result, substituting `fallback` on failure
pub(crate) fn absorb<T>(operation: Operation, result: Result<T>, fallback: impl FnOnce() -> T) -> T {
    debug_assert_ne!(operation.policy(), FailurePolicy::Propagate);

    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "Plugin {} failed ({} failure, applying {} default): {}",
                operation.action(),
                e.kind(),
                operation.policy(),
                e
            );
            fallback()
        }
    }
}
