//! Record model and wire codec
//!
//! Every type here serializes to exactly the JSON the plugin contract
//! expects. Field names and omission rules are pinned by tests.
//!
//! - [`Endpoint`]: One DNS record
//! - [`Changes`]: The diff of one reconciliation cycle
//! - [`PropertyComparisonRequest`]: Delegated equality check

pub mod changes;
pub mod comparison;
pub mod endpoint;

pub use changes::Changes;
pub use comparison::{PropertyComparisonRequest, PropertyComparisonResponse};
pub use endpoint::{Endpoint, Labels, ProviderSpecific, ProviderSpecificProperty, Targets, Ttl};
