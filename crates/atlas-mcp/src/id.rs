//! Correlation ids for JSON-RPC requests.
//!
//! Each client instance owns its own [`IdSource`]; there is no process-wide
//! id state. Any id handed out is distinct from every other id the same
//! source has handed out, so overlapping calls can never be confused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A JSON-RPC request id: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id.
    Number(i64),
    /// String id.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Produces correlation ids for outgoing requests.
///
/// Implementations must be safe to call from concurrent tasks and must never
/// return the same id twice.
pub trait IdSource: Send + Sync {
    /// Allocate the next id.
    fn next_id(&self) -> RequestId;
}

/// Monotonic counter starting at 1. The default source.
#[derive(Debug)]
pub struct CounterIdSource {
    next: AtomicU64,
}

impl CounterIdSource {
    /// Create a counter whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a counter whose first id is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for CounterIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for CounterIdSource {
    fn next_id(&self) -> RequestId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        // JSON-RPC peers commonly treat ids as i64; wrap instead of overflowing.
        RequestId::Number((n & i64::MAX as u64) as i64)
    }
}

/// Random v4 UUID strings, for clients sharing an endpoint with other
/// clients that also number their requests.
#[derive(Debug, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&self) -> RequestId {
        RequestId::String(uuid::Uuid::new_v4().to_string())
    }
}
