//! MCP (Model Context Protocol) client over streamed HTTP.
//!
//! This crate talks JSON-RPC 2.0 to a remote tool server: it discovers the
//! server's tools and invokes them. Each call is one HTTP POST whose response
//! body is a sequence of `data: <json>` lines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpClient                                                  │
//! │  - initialize, tools/list, tools/call                       │
//! │  - owns the IdSource (correlation ids)                      │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HttpTransport                                              │
//! │  - one POST per call, deadline + cancellation               │
//! │  - body: LineDecoder → frame::parse_line → ResponseMatcher  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use atlas_mcp::{McpClient, McpClientConfig};
//! use serde_json::json;
//!
//! # async fn example() -> atlas_mcp::Result<()> {
//! let client = McpClient::new(McpClientConfig::new("http://localhost:8000/mcp"))?;
//!
//! let init = client.initialize().await?;
//! println!("Connected to: {} v{}", init.server_info.name, init.server_info.version);
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {} - {}", tool.name, tool.summary());
//! }
//!
//! let result = client
//!     .call_tool("get_layer_fields", json!({"layer": "rivers"}))
//!     .await?;
//! println!("Result: {}", result);
//! # Ok(())
//! # }
//! ```
//!
//! # Wire format
//!
//! ```text
//! POST /mcp
//! Content-Type: application/json
//! Accept: application/json, text/event-stream
//!
//! {"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {}}
//! ```
//!
//! ```text
//! event: message
//! data: {"jsonrpc": "2.0", "id": 1, "result": {"tools": [...]}}
//! ```
//!
//! Lines without the `data: ` prefix are ignored, frames for other ids are
//! discarded, and the first frame with the request's id completes the call.

pub mod client;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod id;
pub mod matcher;
pub mod protocol;
pub mod transport;

// Re-export main types
pub use client::McpClient;
pub use decoder::{DecodedLine, LineDecoder, decode_lines};
pub use error::{ErrorKind, McpError, Result};
pub use id::{CounterIdSource, IdSource, RequestId, UuidIdSource};
pub use matcher::{MatchOutcome, ResponseMatcher};
pub use protocol::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities,
    ServerInfo, ToolContent, ToolInfo, ToolsCapability,
};
pub use transport::{HttpTransport, McpClientConfig};

/// Cancellation token accepted by the `*_with_cancel` operations.
pub use tokio_util::sync::CancellationToken;
