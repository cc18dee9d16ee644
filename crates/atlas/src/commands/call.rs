//! `atlas call`: invoke a tool with `<key> <value>` arguments.
//!
//! Each value is read as JSON when it parses (`42`, `true`, `["a"]`) and as
//! a plain string otherwise, so `atlas call query_layer layer_name rivers
//! return_count_only true` sends `{"layer_name": "rivers", "return_count_only": true}`.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::{Map, Value};

use atlas_mcp::CallToolResult;

use super::{Context, with_kind};

/// Arguments for `atlas call`.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Name of the tool to call
    pub tool: String,

    /// Tool arguments as alternating KEY VALUE pairs
    #[arg(value_name = "KEY VALUE", allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Run `atlas call`.
pub async fn run(args: CallArgs, ctx: &Context) -> Result<()> {
    let arguments = parse_arguments(&args.params)?;
    let client = ctx.client()?;

    tracing::debug!(tool = %args.tool, arguments = %arguments, "calling tool");
    let result = client
        .call_tool_with_cancel(&args.tool, arguments, &ctx.cancel)
        .await
        .map_err(with_kind)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let view = CallToolResult::from_value(result.clone()).ok();
    println!("{}", render(&result, view.as_ref())?);

    if view.is_some_and(|v| v.is_error()) {
        bail!("tool '{}' reported an error", args.tool);
    }
    Ok(())
}

/// Turn `KEY VALUE KEY VALUE ...` into a JSON object.
pub fn parse_arguments(params: &[String]) -> Result<Value> {
    if params.len() % 2 != 0 {
        bail!(
            "tool arguments must be KEY VALUE pairs; '{}' has no value",
            params[params.len() - 1]
        );
    }

    let mut map = Map::new();
    for pair in params.chunks(2) {
        map.insert(pair[0].clone(), coerce_value(&pair[1]));
    }
    Ok(Value::Object(map))
}

fn coerce_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Structured content first, then text content, then the raw result.
fn render(result: &Value, view: Option<&CallToolResult>) -> Result<String> {
    if let Some(view) = view {
        if let Some(ref structured) = view.structured_content {
            return Ok(serde_json::to_string_pretty(structured)?);
        }
        if let Some(text) = view.text() {
            return Ok(text);
        }
    }
    Ok(serde_json::to_string_pretty(result)?)
}
