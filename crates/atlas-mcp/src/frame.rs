//! Data frame parsing.
//!
//! A response body is a sequence of lines. Lines starting with `data: `
//! carry one JSON-RPC message each; every other line (blank separators,
//! `event:`/`id:` fields, comments) is ignored.

use serde_json::Value;

use crate::error::{McpError, Result};
use crate::id::RequestId;
use crate::protocol::{JSONRPC_VERSION, JsonRpcMessage, JsonRpcResponse};

/// Prefix marking a data frame.
pub const DATA_PREFIX: &str = "data: ";

/// Parse one logical line.
///
/// Returns `Ok(None)` when the line is not a data frame.
pub fn parse_line(line: &str) -> Result<Option<JsonRpcMessage>> {
    match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => parse_payload(payload).map(Some),
        None => Ok(None),
    }
}

/// Parse a frame payload as a JSON-RPC message.
///
/// Responses are checked for the result/error exclusivity rule here, so a
/// malformed response is a framing error whatever its id.
pub fn parse_payload(payload: &str) -> Result<JsonRpcMessage> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| McpError::framing(format!("invalid JSON in data frame: {}", e), payload))?;

    let Some(object) = value.as_object() else {
        return Err(McpError::framing(
            "data frame is not a JSON-RPC object",
            payload,
        ));
    };

    match object.get("jsonrpc").and_then(Value::as_str) {
        Some(JSONRPC_VERSION) => {}
        Some(other) => {
            return Err(McpError::framing(
                format!("unsupported JSON-RPC version {:?}", other),
                payload,
            ));
        }
        None => {
            return Err(McpError::framing("missing jsonrpc version", payload));
        }
    }

    if let Some(method) = object.get("method").and_then(Value::as_str) {
        let id = object
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<RequestId>(id).ok());
        return Ok(JsonRpcMessage::ServerMessage {
            method: method.to_string(),
            id,
        });
    }

    let response: JsonRpcResponse = serde_json::from_value(value)
        .map_err(|e| McpError::framing(format!("malformed response: {}", e), payload))?;
    response
        .validate()
        .map_err(|reason| McpError::framing(reason, payload))?;

    Ok(JsonRpcMessage::Response(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(line: &str) -> JsonRpcResponse {
        match parse_line(line) {
            Ok(Some(JsonRpcMessage::Response(resp))) => resp,
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        for line in ["", "event: message", "id: 4", ": keepalive", "data:{}", "DATA: {}"] {
            assert!(parse_line(line).unwrap().is_none(), "line {:?}", line);
        }
    }

    #[test]
    fn test_parses_success_response() {
        let resp = response(r#"data: {"jsonrpc":"2.0","id":5,"result":{"ok":true}}"#);
        assert_eq!(resp.id, Some(RequestId::Number(5)));
        assert_eq!(resp.result.unwrap()["ok"], true);
    }

    #[test]
    fn test_parses_error_response() {
        let resp = response(
            r#"data: {"jsonrpc":"2.0","id":"abc","error":{"code":-32601,"message":"unknown tool"}}"#,
        );
        assert_eq!(resp.id, Some(RequestId::from("abc")));
        assert_eq!(resp.error.unwrap().message, "unknown tool");
    }

    #[test]
    fn test_null_id_error_response_parses() {
        let resp = response(
            r#"data: {"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#,
        );
        assert_eq!(resp.id, None);
        assert_eq!(resp.error.unwrap().code, -32700);

        let resp = response(r#"data: {"jsonrpc":"2.0","id":7.5,"result":{}}"#);
        assert_eq!(resp.id, None);
    }

    #[test]
    fn test_codeless_error_parses() {
        let resp = response(r#"data: {"jsonrpc":"2.0","id":1,"error":{"message":"unknown tool"}}"#);
        assert_eq!(resp.error.unwrap().message, "unknown tool");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = parse_line("data: {\"jsonrpc\":\"2.0\",").unwrap_err();
        match err {
            McpError::Framing { message, line } => {
                assert!(message.contains("invalid JSON"));
                assert_eq!(line, "{\"jsonrpc\":\"2.0\",");
            }
            other => panic!("expected framing error, got {:?}", other),
        }
    }

    #[test]
    fn test_both_result_and_error_is_rejected() {
        let err = parse_line(
            r#"data: {"jsonrpc":"2.0","id":1,"result":{},"error":{"code":1,"message":"x"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, McpError::Framing { .. }));
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_neither_result_nor_error_is_rejected() {
        let err = parse_line(r#"data: {"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(err, McpError::Framing { .. }));
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(matches!(
            parse_line("data: [1,2,3]"),
            Err(McpError::Framing { .. })
        ));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        assert!(matches!(
            parse_line(r#"data: {"jsonrpc":"1.0","id":1,"result":{}}"#),
            Err(McpError::Framing { .. })
        ));
        assert!(matches!(
            parse_line(r#"data: {"id":1,"result":{}}"#),
            Err(McpError::Framing { .. })
        ));
    }

    #[test]
    fn test_server_messages_are_classified() {
        let notification =
            parse_line(r#"data: {"jsonrpc":"2.0","method":"notifications/progress","params":{}}"#)
                .unwrap()
                .unwrap();
        assert!(matches!(
            notification,
            JsonRpcMessage::ServerMessage { ref method, id: None } if method == "notifications/progress"
        ));

        let request = parse_line(r#"data: {"jsonrpc":"2.0","id":9,"method":"ping"}"#)
            .unwrap()
            .unwrap();
        assert!(matches!(
            request,
            JsonRpcMessage::ServerMessage { id: Some(RequestId::Number(9)), .. }
        ));
    }

    #[test]
    fn test_payload_whitespace_is_tolerated() {
        let resp = response("data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":null}  ");
        assert_eq!(resp.result, Some(Value::Null));
    }
}
