//! Correlates parsed frames with the request awaiting completion.

use crate::error::{McpError, Result};
use crate::id::RequestId;
use crate::protocol::{JsonRpcMessage, JsonRpcResponse};

/// What to do after feeding one frame.
#[derive(Debug)]
pub enum MatchOutcome {
    /// The frame answers the awaited request.
    Matched(JsonRpcResponse),
    /// The frame belongs to something else; keep reading.
    Continue,
    /// The frame was malformed; the call cannot complete.
    Failed(McpError),
}

/// Waits for the response whose id equals the wanted id.
///
/// Frames for other ids are discarded, not requeued: one HTTP exchange
/// carries one logical response.
#[derive(Debug)]
pub struct ResponseMatcher {
    wanted: RequestId,
    skipped: usize,
}

impl ResponseMatcher {
    /// Create a matcher for the given id.
    pub fn new(wanted: RequestId) -> Self {
        Self { wanted, skipped: 0 }
    }

    /// The id being waited for.
    pub fn wanted(&self) -> &RequestId {
        &self.wanted
    }

    /// Number of well-formed frames discarded so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Feed one parsed frame (or its parse failure).
    pub fn feed(&mut self, candidate: Result<JsonRpcMessage>) -> MatchOutcome {
        match candidate {
            Err(err) => MatchOutcome::Failed(err),
            Ok(JsonRpcMessage::Response(response))
                if response.id.as_ref() == Some(&self.wanted) =>
            {
                MatchOutcome::Matched(response)
            }
            Ok(JsonRpcMessage::Response(response)) => {
                self.skipped += 1;
                tracing::debug!(
                    wanted = %self.wanted,
                    got = ?response.id,
                    "discarding response for another request"
                );
                MatchOutcome::Continue
            }
            Ok(JsonRpcMessage::ServerMessage { method, id }) => {
                self.skipped += 1;
                tracing::debug!(
                    wanted = %self.wanted,
                    method = %method,
                    server_request = id.is_some(),
                    "skipping server-initiated message"
                );
                MatchOutcome::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::JsonRpcError;

    fn ok(id: i64) -> Result<JsonRpcMessage> {
        Ok(JsonRpcMessage::Response(JsonRpcResponse::success(
            RequestId::Number(id),
            json!({ "seq": id }),
        )))
    }

    #[test]
    fn test_matches_wanted_id() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(5));
        match matcher.feed(ok(5)) {
            MatchOutcome::Matched(resp) => assert_eq!(resp.id, Some(RequestId::Number(5))),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(5));
        let frames = vec![
            Ok(JsonRpcMessage::Response(JsonRpcResponse::success(
                RequestId::Number(5),
                json!("first"),
            ))),
            ok(7),
            Ok(JsonRpcMessage::Response(JsonRpcResponse::success(
                RequestId::Number(5),
                json!("third"),
            ))),
        ];

        let mut matched = None;
        for frame in frames {
            if let MatchOutcome::Matched(resp) = matcher.feed(frame) {
                matched = Some(resp);
                break;
            }
        }
        assert_eq!(matched.unwrap().result, Some(json!("first")));
        assert_eq!(matcher.skipped(), 0);
    }

    #[test]
    fn test_other_ids_continue() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(5));
        assert!(matches!(matcher.feed(ok(7)), MatchOutcome::Continue));
        assert!(matches!(matcher.feed(ok(8)), MatchOutcome::Continue));
        assert_eq!(matcher.skipped(), 2);
    }

    #[test]
    fn test_string_and_number_ids_do_not_match() {
        let mut matcher = ResponseMatcher::new(RequestId::from("5"));
        assert!(matches!(matcher.feed(ok(5)), MatchOutcome::Continue));
    }

    #[test]
    fn test_error_response_with_wanted_id_matches() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(3));
        let frame = Ok(JsonRpcMessage::Response(JsonRpcResponse::failure(
            RequestId::Number(3),
            JsonRpcError::new(JsonRpcError::METHOD_NOT_FOUND, "unknown tool"),
        )));
        assert!(matches!(matcher.feed(frame), MatchOutcome::Matched(resp) if resp.is_error()));
    }

    #[test]
    fn test_null_id_continues() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(1));
        let mut parse_error = JsonRpcResponse::failure(
            RequestId::Number(0),
            JsonRpcError::new(JsonRpcError::PARSE_ERROR, "Parse error"),
        );
        parse_error.id = None;
        assert!(matches!(
            matcher.feed(Ok(JsonRpcMessage::Response(parse_error))),
            MatchOutcome::Continue
        ));
        assert!(matches!(matcher.feed(ok(1)), MatchOutcome::Matched(_)));
    }

    #[test]
    fn test_server_messages_continue() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(1));
        let frame = Ok(JsonRpcMessage::ServerMessage {
            method: "notifications/progress".to_string(),
            id: None,
        });
        assert!(matches!(matcher.feed(frame), MatchOutcome::Continue));
    }

    #[test]
    fn test_parse_failure_fails_immediately() {
        let mut matcher = ResponseMatcher::new(RequestId::Number(1));
        let outcome = matcher.feed(Err(McpError::framing("invalid JSON", "{")));
        assert!(matches!(
            outcome,
            MatchOutcome::Failed(McpError::Framing { .. })
        ));
    }
}
