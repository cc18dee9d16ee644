//! CLI command handlers.

pub mod call;
pub mod init;
pub mod tools;

use anyhow::Result;

use atlas_config::AtlasConfig;
use atlas_mcp::{CancellationToken, ClientInfo, McpClient, McpClientConfig, McpError};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved client configuration (files, env and flags applied).
    pub client_config: McpClientConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Fired on Ctrl-C.
    pub cancel: CancellationToken,
}

impl Context {
    /// Build a client for the configured endpoint.
    pub fn client(&self) -> Result<McpClient> {
        McpClient::new(self.client_config.clone()).map_err(with_kind)
    }
}

/// Resolve the client configuration: config file layers first, then flags.
pub fn client_config(
    config: &AtlasConfig,
    url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<McpClientConfig> {
    let mut config = config.clone();
    let mut mcp = config.mcp();
    if let Some(url) = url {
        mcp.url = url;
    }
    if let Some(timeout_secs) = timeout_secs {
        mcp.timeout_secs = timeout_secs;
    }
    config.mcp = Some(mcp);
    config.validate()?;

    let mcp = config.mcp();
    let client = config.client();
    let mut resolved = McpClientConfig::new(mcp.url.clone())
        .with_timeout(mcp.timeout())
        .with_connect_timeout(mcp.connect_timeout())
        .with_client_info(ClientInfo::new(client.name, client.version));
    for (key, value) in mcp.header_pairs() {
        resolved = resolved.with_header(key, value);
    }
    Ok(resolved)
}

/// Attach the error's kind so the exit message names the failure class.
pub fn with_kind(err: McpError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("{} error", kind))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let resolved = client_config(&AtlasConfig::default(), None, None).unwrap();
        assert_eq!(resolved.url, "http://localhost:8000/mcp");
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert_eq!(resolved.client_info.name, "atlas");
        assert!(resolved.headers.is_empty());
    }

    #[test]
    fn test_flags_override_file() {
        let file = AtlasConfig::from_toml(
            r#"
[mcp]
url = "http://from-file:8000/mcp"
timeout_secs = 90
headers = [["Authorization", "Bearer abc"]]

[client]
name = "gis-desk"
version = "3.0.0"
"#,
        )
        .unwrap();

        let resolved =
            client_config(&file, Some("https://from-flag.example/mcp".to_string()), Some(5))
                .unwrap();
        assert_eq!(resolved.url, "https://from-flag.example/mcp");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(
            resolved.headers,
            vec![("Authorization".to_string(), "Bearer abc".to_string())]
        );
        assert_eq!(resolved.client_info, ClientInfo::new("gis-desk", "3.0.0"));
    }

    #[test]
    fn test_invalid_flag_url_rejected() {
        let err = client_config(&AtlasConfig::default(), Some("nope".to_string()), None)
            .unwrap_err();
        assert!(err.to_string().contains("mcp.url"));
    }

    #[test]
    fn test_with_kind_names_the_class() {
        let err = with_kind(McpError::Cancelled);
        assert_eq!(err.to_string(), "cancelled error");
        assert!(format!("{:#}", err).contains("request cancelled"));
    }
}
