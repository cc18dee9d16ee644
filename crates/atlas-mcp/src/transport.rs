//! HTTP transport for MCP communication.
//!
//! Every request is one HTTP POST. The response body is read incrementally
//! and driven through decoder → frame parser → matcher until the response
//! carrying the request's id shows up.

use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::decoder::decode_lines;
use crate::error::{McpError, Result};
use crate::frame;
use crate::id::RequestId;
use crate::matcher::{MatchOutcome, ResponseMatcher};
use crate::protocol::{ClientInfo, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse};

/// Default MCP endpoint.
pub const DEFAULT_URL: &str = "http://localhost:8000/mcp";

/// Default deadline for a whole call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_JSON_OR_EVENT_STREAM: &str = "application/json, text/event-stream";

/// Configuration for an MCP client.
#[derive(Debug, Clone)]
pub struct McpClientConfig {
    /// Endpoint URL requests are POSTed to.
    pub url: String,
    /// Deadline for a whole call, from sending to the matched response.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// Identity announced in the handshake.
    pub client_info: ClientInfo,
}

impl Default for McpClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            headers: Vec::new(),
            client_info: ClientInfo::default(),
        }
    }
}

impl McpClientConfig {
    /// Create a config for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the identity announced in the handshake.
    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }
}

/// Sends JSON-RPC requests over HTTP and waits for the correlated response.
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: Url,
    config: McpClientConfig,
}

impl HttpTransport {
    /// Create a transport. Fails if the URL does not parse.
    pub fn new(config: McpClientConfig) -> Result<Self> {
        let url = Url::parse(&config.url)?;

        // No idle connections are kept: every call is its own exchange.
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| McpError::transport(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(
            url = %url,
            timeout_secs = config.timeout.as_secs(),
            "created MCP HTTP transport"
        );

        Ok(Self { http, url, config })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Transport configuration.
    pub fn config(&self) -> &McpClientConfig {
        &self.config
    }

    /// Send a request and wait for its response, bounded by the configured
    /// deadline and, if given, a cancellation token.
    ///
    /// The response body is dropped on every exit path.
    pub async fn send(
        &self,
        request: &JsonRpcRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<JsonRpcResponse> {
        let deadline = self.config.timeout;
        let bounded = async {
            tokio::time::timeout(deadline, self.exchange(request))
                .await
                .unwrap_or(Err(McpError::Timeout(deadline)))
        };

        let outcome = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(McpError::Cancelled),
                outcome = bounded => outcome,
            },
            None => bounded.await,
        };

        match &outcome {
            Ok(_) => tracing::debug!(method = %request.method, id = %request.id, "request matched"),
            Err(e) => tracing::debug!(
                method = %request.method,
                id = %request.id,
                kind = %e.kind(),
                error = %e,
                "request failed"
            ),
        }
        outcome
    }

    async fn exchange(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let body = serde_json::to_string(request)?;

        tracing::trace!(
            url = %self.url,
            json = %body,
            "sending MCP HTTP request"
        );

        let mut req = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_JSON_OR_EVENT_STREAM)
            .body(body);
        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        let response = req
            .send()
            .await
            .map_err(|e| McpError::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Err(McpError::transport("no response body"));
        }

        let is_plain_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().starts_with("application/json"));

        if is_plain_json {
            let body = response
                .bytes()
                .await
                .map_err(|e| McpError::transport(format!("failed to read response body: {}", e)))?;
            read_json_body(&body, &request.id)
        } else {
            read_response(response.bytes_stream(), &request.id).await
        }
    }
}

/// Drive a framed response body until the response for `wanted` appears.
///
/// Lines already consumed are never revisited. The byte stream is dropped
/// when this returns.
pub async fn read_response<S, E>(byte_stream: S, wanted: &RequestId) -> Result<JsonRpcResponse>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut matcher = ResponseMatcher::new(wanted.clone());
    let lines = decode_lines(byte_stream);
    futures::pin_mut!(lines);

    while let Some(line) = lines.next().await {
        let line = line?;
        tracing::trace!(line = %line.text, "received MCP stream line");

        let candidate = match frame::parse_line(&line.text) {
            Ok(None) => continue,
            Ok(Some(message)) => Ok(message),
            Err(e) if !line.terminated && is_cut_off(&line.text) => {
                tracing::debug!(error = %e, "ignoring truncated final frame");
                break;
            }
            Err(e) => Err(e),
        };

        match matcher.feed(candidate) {
            MatchOutcome::Matched(response) => return Ok(response),
            MatchOutcome::Continue => {}
            MatchOutcome::Failed(err) => {
                tracing::warn!(
                    wanted = %wanted,
                    error = %err,
                    "malformed frame on response stream"
                );
                return Err(err);
            }
        }
    }

    tracing::debug!(
        wanted = %wanted,
        skipped = matcher.skipped(),
        "response stream ended without a match"
    );
    Err(McpError::UnmatchedStream { id: wanted.clone() })
}

/// Whether an unterminated final line is a data frame whose JSON ends early.
fn is_cut_off(line: &str) -> bool {
    line.strip_prefix(frame::DATA_PREFIX)
        .is_some_and(|payload| serde_json::from_str::<Value>(payload).is_err_and(|e| e.is_eof()))
}

/// Handle an `application/json` body: the whole body is one message.
///
/// An error response with a null id is the server rejecting this very
/// request before it could read the id, so it is returned as the answer.
fn read_json_body(body: &[u8], wanted: &RequestId) -> Result<JsonRpcResponse> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return Err(McpError::transport("empty response body"));
    }

    tracing::trace!(json = %text, "received MCP JSON response");

    let message = match frame::parse_payload(text) {
        Ok(JsonRpcMessage::Response(response)) if response.id.is_none() && response.is_error() => {
            tracing::debug!(wanted = %wanted, "server rejected request without an id");
            return Ok(response);
        }
        other => other,
    };

    let mut matcher = ResponseMatcher::new(wanted.clone());
    match matcher.feed(message) {
        MatchOutcome::Matched(response) => Ok(response),
        MatchOutcome::Continue => Err(McpError::UnmatchedStream { id: wanted.clone() }),
        MatchOutcome::Failed(err) => Err(err),
    }
}
