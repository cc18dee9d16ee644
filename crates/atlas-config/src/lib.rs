//! Configuration system for the Atlas MCP client.
//!
//! Provides TOML-based configuration with:
//! - The MCP endpoint, per-call deadlines and extra headers (`[mcp]`)
//! - The client identity sent during the handshake (`[client]`)
//! - An optional JSON log file (`[logging]`)
//!
//! Config files are layered: the user config directory first, then a
//! project-local `atlas.toml`. CLI flags are applied on top by the binary.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
