//! Core traits for the DNS plugin adapter
//!
//! - [`DnsProvider`]: The surface the reconciliation engine consumes

pub mod dns_provider;

pub use dns_provider::DnsProvider;
