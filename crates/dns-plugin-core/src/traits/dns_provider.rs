// # DNS Provider Trait
//
// Defines the interface the reconciliation engine uses to read and change
// DNS records.
//
// ## Implementations
//
// - Out-of-process plugin over HTTP: `dns-provider-plugin` crate
//
// ## Usage
//
// ```rust,ignore
// use dns_plugin_core::{CancellationToken, Changes, DnsProvider, Endpoint};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let cancel = CancellationToken::new();
//
//     let current = provider.records(&cancel).await?;
//     let desired = provider.adjust_endpoints(&wanted, &cancel).await;
//
//     provider.apply_changes(&Changes::new().with_create(desired), &cancel).await?;
//     Ok(())
// }
// ```

use crate::model::{Changes, Endpoint};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Failure Policies
///
/// The four operations do not share one error policy:
///
/// | Operation | On failure |
/// |---|---|
/// | [`records`](DnsProvider::records) | error returned |
/// | [`apply_changes`](DnsProvider::apply_changes) | error returned |
/// | [`property_values_equal`](DnsProvider::property_values_equal) | `true` |
/// | [`adjust_endpoints`](DnsProvider::adjust_endpoints) | empty |
///
/// Returning "equal" avoids spurious updates while a provider is degraded.
/// Returning "no endpoints" keeps a possibly stale view out of the plan.
///
/// # Retries
///
/// Implementations never retry. A failed call is reported (or absorbed) and
/// the caller decides what to do next.
///
/// # Cancellation
///
/// Every operation takes a [`CancellationToken`]. Cancelling it before the
/// provider has answered aborts the call: `records` and `apply_changes`
/// return [`Error::Cancelled`](crate::Error::Cancelled), the other two fold
/// into their failure defaults.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record the provider currently holds
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: Records in provider order; empty when there are none
    /// - `Err(Error)`: Transport, status or decoding failure
    async fn records(&self, cancel: &CancellationToken) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a change set
    ///
    /// Either the whole change set is accepted or an error is returned.
    ///
    /// # Parameters
    ///
    /// - `changes`: The diff to apply; unset sequences stay distinct from empty ones
    async fn apply_changes(
        &self,
        changes: &Changes,
        cancel: &CancellationToken,
    ) -> Result<(), crate::Error>;

    /// Decide whether two values of a named property are equal
    ///
    /// Default: plain string equality.
    async fn property_values_equal(
        &self,
        _name: &str,
        previous: &str,
        current: &str,
        _cancel: &CancellationToken,
    ) -> bool {
        previous == current
    }

    /// Normalize endpoints before they are diffed against provider state
    ///
    /// Default: endpoints are returned unchanged.
    async fn adjust_endpoints(
        &self,
        endpoints: &[Endpoint],
        _cancel: &CancellationToken,
    ) -> Vec<Endpoint> {
        endpoints.to_vec()
    }

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
