//! Scripted plugin server and common utilities for contract tests
//!
//! The server answers the negotiation probe on `/` and replays one scripted
//! reply for every other path. Each request is captured (method, path,
//! headers, body) so tests can assert on exactly what went over the wire.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::Response;
use dns_provider_plugin::PluginProvider;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Versioned media type every request must carry
pub const MEDIA_TYPE: &str = "application/external.dns.plugin+json;version=1";

/// One request as received by the scripted server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// How the server answers the negotiation probe
#[derive(Debug, Clone)]
pub struct Negotiation {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub vary: Option<&'static str>,
}

impl Default for Negotiation {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some(MEDIA_TYPE),
            vary: Some("Content-Type"),
        }
    }
}

/// How the server answers every operation request
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    pub status: StatusCode,
    pub payload: String,
    pub delay: Option<Duration>,
}

impl ScriptedReply {
    pub fn new(status: StatusCode, payload: impl Into<String>) -> Self {
        Self {
            status,
            payload: payload.into(),
            delay: None,
        }
    }

    /// Empty-body 204 reply
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, "")
    }

    /// Hold the reply back for `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

struct ServerState {
    negotiation: Negotiation,
    reply: ScriptedReply,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// A plugin server bound to an ephemeral local port
pub struct PluginServer {
    pub url: String,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl PluginServer {
    /// Start a server with a well-behaved negotiation endpoint
    pub async fn start(reply: ScriptedReply) -> Self {
        Self::start_with(Negotiation::default(), reply).await
    }

    /// Start a server with a custom negotiation answer
    pub async fn start_with(negotiation: Negotiation, reply: ScriptedReply) -> Self {
        let state = Arc::new(ServerState {
            negotiation,
            reply,
            captured: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(serve_scripted)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Connect an adapter to this server with default settings
    pub async fn provider(&self) -> PluginProvider {
        PluginProvider::new(&self.url)
            .await
            .expect("negotiation succeeds")
    }

    /// Negotiation probes received so far
    pub fn negotiation_requests(&self) -> Vec<CapturedRequest> {
        self.captured()
            .into_iter()
            .filter(|r| r.path == "/")
            .collect()
    }

    /// Operation requests received so far (everything except the probe)
    pub fn operation_requests(&self) -> Vec<CapturedRequest> {
        self.captured()
            .into_iter()
            .filter(|r| r.path != "/")
            .collect()
    }

    /// The single operation request received so far
    pub fn only_operation_request(&self) -> CapturedRequest {
        let mut requests = self.operation_requests();
        assert_eq!(
            requests.len(),
            1,
            "expected exactly one operation request, got {:?}",
            requests
        );
        requests.remove(0)
    }

    fn captured(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

impl Drop for PluginServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn serve_scripted(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();

    state.captured.lock().unwrap().push(CapturedRequest {
        method,
        path: path.clone(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if path == "/" {
        let negotiation = &state.negotiation;
        let mut response = Response::builder().status(negotiation.status);
        if let Some(content_type) = negotiation.content_type {
            response = response.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(vary) = negotiation.vary {
            response = response.header(header::VARY, vary);
        }
        return response.body(Body::empty()).unwrap();
    }

    let reply = &state.reply;
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, MEDIA_TYPE)
        .body(Body::from(reply.payload.clone()))
        .unwrap()
}
