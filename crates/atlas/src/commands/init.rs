//! `atlas init`: perform the MCP handshake and report the server.

use anyhow::Result;
use clap::Args;

use super::{Context, with_kind};

/// Arguments for `atlas init`.
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Run `atlas init`.
pub async fn run(_args: InitArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let init = client
        .initialize_with_cancel(&ctx.cancel)
        .await
        .map_err(with_kind)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&init)?);
        return Ok(());
    }

    println!("Connected to: {}", client.url());
    println!("  Server: {} v{}", init.server_info.name, init.server_info.version);
    println!("  Protocol: {}", init.protocol_version);

    let tools = init
        .capabilities
        .tools
        .as_ref()
        .map(|t| match t.list_changed {
            Some(true) => "yes (list may change)",
            _ => "yes",
        })
        .unwrap_or("no");
    println!("  Tools: {}", tools);

    if ctx.verbose
        && let Some(ref instructions) = init.instructions
    {
        println!();
        println!("Instructions:");
        for line in instructions.lines() {
            println!("  {}", line);
        }
    }

    Ok(())
}
