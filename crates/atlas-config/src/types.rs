//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [mcp]                    # endpoint and per-call limits
//! [client]                 # identity sent in the initialize handshake
//! [logging]                # optional JSON log file
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default MCP endpoint.
pub const DEFAULT_MCP_URL: &str = "http://localhost:8000/mcp";

/// Default per-call deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default client name reported to servers.
pub const DEFAULT_CLIENT_NAME: &str = "atlas";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// MCP endpoint configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp: Option<McpSection>,

    /// Client identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSection>,

    /// Log file configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSection>,
}

impl AtlasConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: AtlasConfig) {
        if other.mcp.is_some() {
            self.mcp = other.mcp;
        }

        if other.client.is_some() {
            self.client = other.client;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// The `[mcp]` section, or its defaults when absent.
    pub fn mcp(&self) -> McpSection {
        self.mcp.clone().unwrap_or_default()
    }

    /// The `[client]` section, or its defaults when absent.
    pub fn client(&self) -> ClientSection {
        self.client.clone().unwrap_or_default()
    }

    /// The `[logging]` section, or its defaults when absent.
    pub fn logging(&self) -> LoggingSection {
        self.logging.clone().unwrap_or_default()
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref mcp) = self.mcp {
            mcp.validate()?;
        }
        if let Some(ref client) = self.client
            && client.name.trim().is_empty()
        {
            return Err(ConfigError::invalid("client.name", "must not be empty"));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MCP Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// MCP endpoint configuration.
///
/// ```toml
/// [mcp]
/// url = "https://atlas.example.org/mcp"
/// timeout_secs = 60
/// headers = [["Authorization", "Bearer abc123"]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSection {
    /// Endpoint URL.
    pub url: String,
    /// Deadline for a whole call (send plus streamed response).
    pub timeout_secs: u64,
    /// Deadline for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Extra HTTP headers as [key, value] pairs.
    pub headers: Vec<[String; 2]>,
}

impl Default for McpSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_MCP_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            headers: Vec::new(),
        }
    }
}

impl McpSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Headers as owned `(name, value)` tuples.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|[k, v]| (k.clone(), v.clone()))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| ConfigError::invalid("mcp.url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "mcp.url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("mcp.timeout_secs", "must be at least 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "mcp.connect_timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Identity reported as `clientInfo` during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub name: String,
    pub version: String,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_CLIENT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// JSON log file settings. Console logging is always on.
///
/// ```toml
/// [logging]
/// file = true
/// directory = "/var/log/atlas"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Whether to write a daily-rotated JSON log file.
    pub file: bool,
    /// Directory for log files. Defaults to `<config dir>/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl LoggingSection {
    /// The configured directory, or `logs/` under the user config directory.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| crate::xdg_config_dir().map(|d| d.join("logs")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
