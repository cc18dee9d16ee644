//! MCP client: the `initialize`, `tools/list` and `tools/call` operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{McpError, Result};
use crate::id::{CounterIdSource, IdSource};
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, METHOD_INITIALIZE, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, ToolInfo,
};
use crate::transport::{HttpTransport, McpClientConfig};

/// Client for an MCP server reachable over HTTP.
///
/// All operations take `&self`, so one client can serve concurrent callers
/// (wrap it in an `Arc`). Each call gets its own id, HTTP exchange and
/// decoder state; the id source is the only state calls share.
pub struct McpClient {
    transport: HttpTransport,
    ids: Arc<dyn IdSource>,
    initialized: AtomicBool,
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("url", &self.transport.url().as_str())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl McpClient {
    /// Create a client. No network traffic happens until the first call.
    pub fn new(config: McpClientConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            ids: Arc::new(CounterIdSource::new()),
            initialized: AtomicBool::new(false),
        })
    }

    /// Create a client for the default local endpoint.
    pub fn localhost() -> Result<Self> {
        Self::new(McpClientConfig::default())
    }

    /// Replace the correlation id source.
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Endpoint URL.
    pub fn url(&self) -> &Url {
        self.transport.url()
    }

    /// Whether a handshake has succeeded on this client.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Send a request and return the matched response envelope as-is.
    ///
    /// A response carrying `error` is returned as `Ok`; the named operations
    /// below turn it into [`McpError::ServerError`].
    pub async fn send_request(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse> {
        self.dispatch(method, params, None).await
    }

    /// Like [`send_request`](Self::send_request), abandoning the call when
    /// `cancel` fires.
    pub async fn send_request_with_cancel(
        &self,
        method: &str,
        params: Option<Value>,
        cancel: &CancellationToken,
    ) -> Result<JsonRpcResponse> {
        self.dispatch(method, params, Some(cancel)).await
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<JsonRpcResponse> {
        let request = JsonRpcRequest::new(self.ids.next_id(), method, params);
        tracing::debug!(method = %method, id = %request.id, "sending MCP request");
        self.transport.send(&request, cancel).await
    }

    /// Send a request and unwrap its `result`.
    async fn request(
        &self,
        method: &str,
        params: Option<Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value> {
        self.dispatch(method, params, cancel)
            .await?
            .into_result()
            .map_err(|e| McpError::server_error(e.code, e.message, e.data))
    }

    /// Perform the MCP handshake.
    ///
    /// Every call performs a fresh handshake; repeating it is harmless.
    pub async fn initialize(&self) -> Result<InitializeResult> {
        self.initialize_inner(None).await
    }

    /// [`initialize`](Self::initialize) with cancellation.
    pub async fn initialize_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<InitializeResult> {
        self.initialize_inner(Some(cancel)).await
    }

    async fn initialize_inner(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<InitializeResult> {
        let params = InitializeParams::new(self.transport.config().client_info.clone());
        let result = self
            .request(METHOD_INITIALIZE, Some(serde_json::to_value(&params)?), cancel)
            .await?;

        let init_result: InitializeResult = serde_json::from_value(result)
            .map_err(|e| McpError::protocol(format!("malformed initialize result: {}", e)))?;

        tracing::info!(
            server = %init_result.server_info.name,
            version = %init_result.server_info.version,
            protocol = %init_result.protocol_version,
            "MCP server initialized"
        );

        self.initialized.store(true, Ordering::Release);
        Ok(init_result)
    }

    /// List available tools from the server.
    pub async fn list_tools(&self) -> Result<Vec<ToolInfo>> {
        self.list_tools_inner(None).await
    }

    /// [`list_tools`](Self::list_tools) with cancellation.
    pub async fn list_tools_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolInfo>> {
        self.list_tools_inner(Some(cancel)).await
    }

    async fn list_tools_inner(&self, cancel: Option<&CancellationToken>) -> Result<Vec<ToolInfo>> {
        let result = self.request(METHOD_TOOLS_LIST, None, cancel).await?;
        if result.is_null() {
            return Err(McpError::protocol("tools/list returned no result"));
        }

        let list_result: ListToolsResult = serde_json::from_value(result)
            .map_err(|e| McpError::protocol(format!("malformed tools/list result: {}", e)))?;

        tracing::debug!(
            url = %self.url(),
            tool_count = list_result.tools.len(),
            "listed MCP tools"
        );

        Ok(list_result.tools)
    }

    /// Call a tool on the server.
    ///
    /// `arguments` is passed through untouched and the server's `result` is
    /// returned verbatim. Use [`CallToolResult`](crate::CallToolResult) to
    /// read the standard MCP content shape.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        self.call_tool_inner(name, arguments, None).await
    }

    /// [`call_tool`](Self::call_tool) with cancellation.
    pub async fn call_tool_with_cancel(
        &self,
        name: &str,
        arguments: Value,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.call_tool_inner(name, arguments, Some(cancel)).await
    }

    async fn call_tool_inner(
        &self,
        name: &str,
        arguments: Value,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };

        let outcome = self
            .request(METHOD_TOOLS_CALL, Some(serde_json::to_value(&params)?), cancel)
            .await;

        match &outcome {
            Ok(_) => tracing::debug!(tool = %name, "tool call succeeded"),
            Err(e) => {
                tracing::warn!(tool = %name, kind = %e.kind(), error = %e, "tool call failed")
            }
        }
        outcome
    }
}
