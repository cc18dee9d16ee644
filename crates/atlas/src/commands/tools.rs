//! `atlas tools`: list the tools a server offers.

use anyhow::Result;
use clap::Args;

use atlas_mcp::ToolInfo;

use super::{Context, with_kind};

/// Arguments for `atlas tools`.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Show full descriptions and input schemas
    #[arg(long)]
    pub full: bool,
}

/// Run `atlas tools`.
pub async fn run(args: ToolsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let tools = client
        .list_tools_with_cancel(&ctx.cancel)
        .await
        .map_err(with_kind)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    if tools.is_empty() {
        println!("No tools offered by {}", client.url());
        return Ok(());
    }

    if args.full {
        print_full(&tools)?;
    } else {
        print_table(&tools);
    }
    Ok(())
}

fn print_table(tools: &[ToolInfo]) {
    println!("{:<30} {:<50}", "NAME", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for tool in tools {
        println!("{:<30} {:<50}", truncate(&tool.name, 30), truncate(tool.summary(), 50));
    }
}

fn print_full(tools: &[ToolInfo]) -> Result<()> {
    for (i, tool) in tools.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", tool.name);
        for line in tool.description.lines() {
            println!("  {}", line);
        }
        if !tool.input_schema.is_null() {
            println!("  Input schema:");
            for line in serde_json::to_string_pretty(&tool.input_schema)?.lines() {
                println!("    {}", line);
            }
        }
    }
    Ok(())
}

/// Truncate to `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("query_layer", 30), "query_layer");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
