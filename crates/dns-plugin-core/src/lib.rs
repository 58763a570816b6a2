// # dns-plugin-core
//
// Core library for delegating DNS provider operations to an out-of-process
// plugin.
//
// ## Architecture Overview
//
// This library provides everything a provider adapter and the reconciliation
// engine share:
// - **Endpoint / Changes**: The in-memory record model and its JSON wire codec
// - **PropertyComparison**: Request/response shapes for delegated equality checks
// - **DnsProvider**: Trait the engine consumes (records, apply, compare, adjust)
// - **PluginConfig**: Connection settings for a plugin server
// - **Error**: Failure taxonomy shared by every provider
//
// ## Design Principles
//
// 1. **Wire-exact codec**: Field names, omission rules and `null` vs `[]` are
//    part of the contract and are pinned by tests
// 2. **Value objects**: Nothing in the model has a lifecycle beyond one call
// 3. **Library-First**: The transport lives in provider crates, not here

pub mod config;
pub mod error;
pub mod model;
pub mod traits;

// Re-export core types for convenience
pub use config::PluginConfig;
pub use error::{Error, FailureKind, Result};
pub use model::{
    Changes, Endpoint, Labels, PropertyComparisonRequest, PropertyComparisonResponse,
    ProviderSpecific, ProviderSpecificProperty, Targets, Ttl,
};
pub use traits::DnsProvider;

/// Cancellation signal accepted by every provider operation
pub use tokio_util::sync::CancellationToken;
