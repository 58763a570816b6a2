//! Content negotiation with the plugin server
//!
//! Performed once when the adapter is built. The plugin root must answer a
//! `GET` with a `Content-Type` naming the versioned media type this adapter
//! speaks.
//!
//! ```http
//! GET /
//! Accept: application/external.dns.plugin+json;version=1
//!
//! 200 OK
//! Content-Type: application/external.dns.plugin+json;version=1
//! Vary: Content-Type
//! ```

use crate::classify::transport_error;
use dns_plugin_core::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, VARY};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Media type of every plugin payload, without parameters
pub const MEDIA_TYPE_FORMAT: &str = "application/external.dns.plugin+json";

/// Contract version implemented by this adapter
pub const MEDIA_TYPE_VERSION: &str = "1";

/// Full `Content-Type`/`Accept` value sent on every request
pub const MEDIA_TYPE_FORMAT_AND_VERSION: &str = "application/external.dns.plugin+json;version=1";

/// A parsed `type/subtype; key=value` header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    version: Option<String>,
}

impl MediaType {
    /// Parse a header value
    ///
    /// Returns `None` when there is no `type/subtype` part. The essence is
    /// lowercased; parameters other than `version` are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let essence = parts.next()?.trim().to_ascii_lowercase();

        if !essence.contains('/') {
            return None;
        }

        let version = parts.find_map(|param| {
            let (key, val) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("version")
                .then(|| val.trim().trim_matches('"').to_string())
        });

        Some(Self { essence, version })
    }

    /// The `type/subtype` part
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// The `version` parameter, if present
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether this is the media type and version this adapter implements
    pub fn is_supported(&self) -> bool {
        self.essence == MEDIA_TYPE_FORMAT && self.version() == Some(MEDIA_TYPE_VERSION)
    }

    /// Canonical header value sent back to the plugin
    ///
    /// Normalized to `essence;version=<v>` whatever spelling the plugin used.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let value = match self.version() {
            Some(version) => format!("{};version={}", self.essence, version),
            None => self.essence.clone(),
        };
        HeaderValue::from_str(&value)
            .map_err(|e| Error::negotiation(format!("invalid media type {}: {}", value, e)))
    }
}

/// Probe the plugin root and check the advertised media type
///
/// # Parameters
///
/// - `client`: HTTP client shared with the adapter
/// - `base_url`: Plugin base URL without trailing slash
/// - `timeout`: Deadline for the probe
/// - `cancel`: Caller cancellation
///
/// # Returns
///
/// - `Ok(MediaType)`: The negotiated media type
/// - `Err(Error::Negotiation)`: Unreachable plugin, non-success status or wrong media type
/// - `Err(Error::Cancelled)`: Cancelled by the caller
pub(crate) async fn negotiate(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<MediaType> {
    let url = format!("{}/", base_url);
    tracing::debug!("Negotiating plugin content type: GET {}", url);

    let probe = async {
        client
            .get(&url)
            .header(ACCEPT, MEDIA_TYPE_FORMAT_AND_VERSION)
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        result = probe => result,
    };
    let response =
        result.map_err(|e| Error::negotiation(format!("failed to connect to plugin api: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::negotiation(format!(
            "plugin api returned status code {}",
            status.as_u16()
        )));
    }

    check_headers(response.headers())
}

/// Validate the negotiation response headers
fn check_headers(headers: &HeaderMap) -> Result<MediaType> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    let media_type = MediaType::parse(&content_type)
        .filter(MediaType::is_supported)
        .ok_or_else(|| {
            Error::negotiation(format!(
                "wrong content type returned from server: {}",
                content_type
            ))
        })?;

    let varies_on_content_type = headers
        .get_all(VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|field| field.trim().eq_ignore_ascii_case(CONTENT_TYPE.as_str()));

    if !varies_on_content_type {
        tracing::warn!("Plugin did not send `Vary: Content-Type` during negotiation");
    }

    Ok(media_type)
}
