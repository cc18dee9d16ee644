//! Error types for MCP operations.
//!
//! Every failure a call can end in is a distinct variant, grouped into the
//! coarse categories of [`ErrorKind`] so callers can render a diagnostic
//! without matching on every variant.

use std::time::Duration;

use thiserror::Error;

use crate::id::RequestId;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Error type for MCP operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// Network failure, absent body, or a read failure while streaming.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// A data frame could not be parsed as a JSON-RPC message.
    #[error("framing error: {message}")]
    Framing {
        /// What was wrong with the frame.
        message: String,
        /// The offending payload.
        line: String,
    },

    /// The response body ended before a frame with the awaited id arrived.
    #[error("stream ended before response received (id {id})")]
    UnmatchedStream {
        /// Id the call was waiting for.
        id: RequestId,
    },

    /// Server returned an error response.
    #[error("server error {code}: {message}")]
    ServerError {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        message: String,
        /// Optional additional data.
        data: Option<serde_json::Value>,
    },

    /// A successful response did not have the shape the operation needs.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The call's deadline expired.
    #[error("timeout after {0:?} waiting for response")]
    Timeout(Duration),

    /// The call was cancelled by its caller.
    #[error("request cancelled")]
    Cancelled,

    /// The endpoint URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`McpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP exchange itself failed.
    Transport,
    /// The wire carried a malformed frame.
    Framing,
    /// The stream was well-formed but never answered this call.
    UnmatchedStream,
    /// The server answered with a JSON-RPC error.
    Application,
    /// The answer was a success but not usable by the operation.
    Protocol,
    /// The deadline expired.
    Timeout,
    /// The caller cancelled.
    Cancelled,
    /// The client was misconfigured.
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Framing => "framing",
            Self::UnmatchedStream => "unmatched-stream",
            Self::Application => "application",
            Self::Protocol => "protocol",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

impl McpError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a framing error for the given payload.
    pub fn framing(msg: impl Into<String>, line: impl Into<String>) -> Self {
        Self::Framing {
            message: msg.into(),
            line: line.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a server error from an error response.
    pub fn server_error(
        code: i64,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self::ServerError {
            code,
            message: message.into(),
            data,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::Framing { .. } => ErrorKind::Framing,
            Self::UnmatchedStream { .. } => ErrorKind::UnmatchedStream,
            Self::ServerError { .. } => ErrorKind::Application,
            Self::Protocol(_) | Self::Json(_) => ErrorKind::Protocol,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidUrl(_) => ErrorKind::Config,
        }
    }

    /// Check if the HTTP exchange itself failed.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if the server answered with a JSON-RPC error.
    pub fn is_application(&self) -> bool {
        self.kind() == ErrorKind::Application
    }

    /// Check if the deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Server-supplied error message, if this is an application error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
