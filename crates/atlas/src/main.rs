//! Atlas - command-line client for MCP tool servers
//!
//! Main entry point for the Atlas CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

use commands::{call, init, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Atlas - command-line client for MCP tool servers
#[derive(Parser)]
#[command(name = "atlas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// MCP endpoint URL (default: http://localhost:8000/mcp)
    #[arg(long, global = true, env = "ATLAS_MCP_URL")]
    pub url: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Perform the MCP handshake and show server info
    Init(init::InitArgs),

    /// List the tools the server offers
    Tools(tools::ToolsArgs),

    /// Call a tool
    Call(call::CallArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = atlas_config::load_config(None)?;
    let logging = loaded.config.logging();

    // Console logs go to stderr so stdout stays clean for --json.
    let filter = if cli.verbose {
        "atlas=debug,atlas_mcp=debug,atlas_config=debug,info"
    } else {
        "atlas=info,atlas_mcp=info,warn"
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let (file_layer, _guard) = match logging.file.then(|| logging.resolved_directory()).flatten() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, "atlas.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("atlas=trace,atlas_mcp=trace,atlas_config=trace,info"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(sources = ?loaded.loaded_from(), "configuration loaded");

    let client_config = commands::client_config(&loaded.config, cli.url, cli.timeout)?;

    let cancel = atlas_mcp::CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    // Create context for commands
    let ctx = commands::Context {
        client_config,
        json_output: cli.json,
        verbose: cli.verbose,
        cancel,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Init(args) => init::run(args, &ctx).await,
        Commands::Tools(args) => tools::run(args, &ctx).await,
        Commands::Call(args) => call::run(args, &ctx).await,
    }
}
