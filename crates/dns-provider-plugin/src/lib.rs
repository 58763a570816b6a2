// # Plugin DNS Provider
//
// This crate provides a DNS provider that delegates every operation to an
// out-of-process plugin over HTTP.
//
// ## Behaviour
//
// - ✅ Content negotiation once at construction (`GET /`)
// - ✅ One HTTP request per operation
// - ✅ Records / ApplyChanges failures are returned to the caller
// - ✅ PropertyValuesEqual fails open (`true`)
// - ✅ AdjustEndpoints fails closed (no endpoints)
// - ✅ Per-request timeout and caller cancellation
// - ❌ NO retry logic (owned by the caller)
// - ❌ NO caching (every call reaches the plugin)
// - ❌ NO background tasks
//
// ## API Reference
//
// All payloads use `application/external.dns.plugin+json;version=1`.
//
// - Negotiate: GET `/`
// - List records: GET `/records`
// - Apply changes: POST `/records` (204 on success)
// - Compare property values: POST `/propertyvaluesequal`
// - Adjust endpoints: POST `/adjustendpoints`

pub mod classify;
pub mod negotiate;

use async_trait::async_trait;
use classify::{Operation, absorb, transport_error};
use dns_plugin_core::{
    Changes, DnsProvider, Endpoint, Error, PluginConfig, PropertyComparisonRequest,
    PropertyComparisonResponse, Result,
};
use negotiate::MediaType;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use tokio_util::sync::CancellationToken;

pub use negotiate::{MEDIA_TYPE_FORMAT, MEDIA_TYPE_FORMAT_AND_VERSION, MEDIA_TYPE_VERSION};

/// DNS provider backed by an HTTP plugin
///
/// Immutable after construction; share it behind an `Arc` and call it from
/// as many tasks as needed.
#[derive(Debug, Clone)]
pub struct PluginProvider {
    /// HTTP client, configured with the per-request timeout
    client: reqwest::Client,

    /// Plugin base URL without trailing slash
    base_url: String,

    /// Media type negotiated at construction
    media_type: MediaType,

    /// `Accept`/`Content-Type` value derived from `media_type`
    media_type_header: HeaderValue,
}

impl PluginProvider {
    /// Connect to a plugin with default timeouts
    ///
    /// # Parameters
    ///
    /// - `url`: Plugin base URL (e.g., "http://localhost:8888")
    ///
    /// # Returns
    ///
    /// - `Ok(PluginProvider)`: Ready adapter
    /// - `Err(Error)`: Invalid URL or failed negotiation
    pub async fn new(url: impl Into<String>) -> Result<Self> {
        Self::connect(PluginConfig::new(url), &CancellationToken::new()).await
    }

    /// Connect to a plugin
    ///
    /// Validates the configuration, builds the HTTP client and negotiates the
    /// content type. Negotiation is not repeated afterwards.
    ///
    /// # Parameters
    ///
    /// - `config`: Plugin connection settings
    /// - `cancel`: Aborts the negotiation probe
    pub async fn connect(config: PluginConfig, cancel: &CancellationToken) -> Result<Self> {
        config.validate()?;

        let url = reqwest::Url::parse(&config.url)
            .map_err(|e| Error::config(format!("Invalid plugin URL {}: {}", config.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Plugin URL must use HTTP or HTTPS scheme. Got: {}",
                config.url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.url.trim().trim_end_matches('/').to_string();

        let media_type =
            negotiate::negotiate(&client, &base_url, config.negotiation_timeout(), cancel).await?;

        let media_type_header = media_type.header_value()?;

        tracing::info!(
            "Connected to DNS plugin at {} ({}; version={})",
            base_url,
            media_type.essence(),
            media_type.version().unwrap_or_default()
        );

        Ok(Self {
            client,
            base_url,
            media_type,
            media_type_header,
        })
    }

    /// Plugin base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Media type negotiated at construction
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn resource_url(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.path())
    }

    fn media_type_header(&self) -> HeaderValue {
        self.media_type_header.clone()
    }

    /// Send one request and collect the body of a success reply
    ///
    /// Non-success statuses become [`Error::RemoteStatus`] without reading
    /// the body. Cancellation wins over an in-flight exchange.
    async fn exchange(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let exchange = async {
            let response = request.send().await.map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::remote_status(operation.action(), status.as_u16()));
            }

            let body = response.bytes().await.map_err(transport_error)?;
            Ok::<_, Error>(body.to_vec())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = exchange => result,
        }
    }

    async fn fetch_property_values_equal(
        &self,
        request: &PropertyComparisonRequest,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let operation = Operation::PropertyValuesEqual;
        let url = self.resource_url(operation);
        let payload = serde_json::to_vec(request)?;

        tracing::debug!("POST {} (property: {})", url, request.name);

        let body = self
            .exchange(
                operation,
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, self.media_type_header())
                    .header(ACCEPT, self.media_type_header())
                    .body(payload),
                cancel,
            )
            .await?;

        let response: PropertyComparisonResponse = serde_json::from_slice(&body)?;
        Ok(response.equals)
    }

    async fn fetch_adjusted_endpoints(
        &self,
        endpoints: &[Endpoint],
        cancel: &CancellationToken,
    ) -> Result<Vec<Endpoint>> {
        let operation = Operation::AdjustEndpoints;
        let url = self.resource_url(operation);
        let payload = serde_json::to_vec(endpoints)?;

        tracing::debug!("POST {} ({} endpoint(s))", url, endpoints.len());

        let body = self
            .exchange(
                operation,
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, self.media_type_header())
                    .header(ACCEPT, self.media_type_header())
                    .body(payload),
                cancel,
            )
            .await?;

        decode_endpoints(&body)
    }
}

/// Decode an endpoint list, treating a `null` body as no endpoints
fn decode_endpoints(body: &[u8]) -> Result<Vec<Endpoint>> {
    let endpoints: Option<Vec<Endpoint>> = serde_json::from_slice(body)?;
    Ok(endpoints.unwrap_or_default())
}

#[async_trait]
impl DnsProvider for PluginProvider {
    /// List records held by the plugin
    ///
    /// ```http
    /// GET /records
    /// Accept: application/external.dns.plugin+json;version=1
    /// ```
    async fn records(&self, cancel: &CancellationToken) -> Result<Vec<Endpoint>> {
        let operation = Operation::Records;
        let url = self.resource_url(operation);

        tracing::debug!("GET {}", url);

        let body = self
            .exchange(
                operation,
                self.client
                    .get(&url)
                    .header(ACCEPT, self.media_type_header()),
                cancel,
            )
            .await?;

        let endpoints = decode_endpoints(&body)?;
        tracing::debug!("Plugin returned {} record(s)", endpoints.len());
        Ok(endpoints)
    }

    /// Send a change set to the plugin
    ///
    /// ```http
    /// POST /records
    /// Content-Type: application/external.dns.plugin+json;version=1
    ///
    /// {"Create":[...],"UpdateOld":null,"UpdateNew":null,"Delete":null}
    /// ```
    async fn apply_changes(&self, changes: &Changes, cancel: &CancellationToken) -> Result<()> {
        let operation = Operation::ApplyChanges;
        let url = self.resource_url(operation);
        let payload = serde_json::to_vec(changes)?;

        tracing::debug!(
            "POST {} (create: {}, update: {}, delete: {})",
            url,
            changes.create.as_ref().map_or(0, Vec::len),
            changes.update_new.as_ref().map_or(0, Vec::len),
            changes.delete.as_ref().map_or(0, Vec::len)
        );

        self.exchange(
            operation,
            self.client
                .post(&url)
                .header(CONTENT_TYPE, self.media_type_header())
                .body(payload),
            cancel,
        )
        .await?;

        Ok(())
    }

    /// Ask the plugin whether two property values are equal
    ///
    /// Any failure answers `true`.
    async fn property_values_equal(
        &self,
        name: &str,
        previous: &str,
        current: &str,
        cancel: &CancellationToken,
    ) -> bool {
        let request = PropertyComparisonRequest::new(name, previous, current);
        let result = self.fetch_property_values_equal(&request, cancel).await;
        absorb(Operation::PropertyValuesEqual, result, || true)
    }

    /// Let the plugin normalize endpoints before planning
    ///
    /// Any failure answers an empty list, never the input.
    async fn adjust_endpoints(
        &self,
        endpoints: &[Endpoint],
        cancel: &CancellationToken,
    ) -> Vec<Endpoint> {
        let result = self.fetch_adjusted_endpoints(endpoints, cancel).await;
        absorb(Operation::AdjustEndpoints, result, Vec::new)
    }

    fn provider_name(&self) -> &'static str {
        "plugin"
    }
}
