// Parsing for chat-completions response bodies (success and error envelopes)

use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::traits::{ChatResponse, TokenUsage};

/// User-facing message for a failed request.
///
/// Uses `error.message` from the envelope when present and non-empty,
/// otherwise `HTTP <status>`.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Pull the reply text out of `choices[0]`.
///
/// Returns `None` when `choices` is missing, empty, or its first entry is not
/// an object.
/// Field priority: `message.content`, `delta.content`, then a bare `content`.
/// The `delta` shape shows up when a provider reuses its streaming payload
/// for a non-streaming call.
pub fn extract_reply(raw: &Value) -> Option<String> {
    let choice = raw
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .filter(|choice| choice.is_object())?;

    let text = non_empty_str(choice.pointer("/message/content"))
        .or_else(|| non_empty_str(choice.pointer("/delta/content")))
        .or_else(|| loose_text(choice.get("content")))
        .unwrap_or_default();

    Some(text.trim().to_string())
}

/// Parse a 2xx body into a [`ChatResponse`]
pub fn parse_completion(body: &str) -> Result<ChatResponse> {
    let malformed = || LlmError::MalformedResponse {
        raw: body.to_string(),
    };

    let raw: Value = serde_json::from_str(body).map_err(|_| malformed())?;
    let content = extract_reply(&raw).ok_or_else(malformed)?;

    let finish_reason = raw
        .pointer("/choices/0/finish_reason")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ChatResponse {
        content,
        finish_reason,
        usage: parse_usage(&raw),
        raw,
    })
}

fn parse_usage(raw: &Value) -> Option<TokenUsage> {
    let usage = raw.get("usage")?;
    let field = |name: &str| {
        usage
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };

    Some(TokenUsage {
        input_tokens: field("prompt_tokens")?,
        output_tokens: field("completion_tokens")?,
        total_tokens: field("total_tokens")?,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Bare `content` is not typed by any provider we know of; accept any scalar
fn loose_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_content_wins_over_delta() {
        let raw = json!({
            "choices": [{
                "message": {"content": "from message"},
                "delta": {"content": "from delta"}
            }]
        });
        assert_eq!(extract_reply(&raw).as_deref(), Some("from message"));
    }

    #[test]
    fn test_delta_used_when_message_empty() {
        let raw = json!({
            "choices": [{
                "message": {"content": ""},
                "delta": {"content": "  streamed  "}
            }]
        });
        assert_eq!(extract_reply(&raw).as_deref(), Some("streamed"));
    }

    #[test]
    fn test_bare_content_fallback() {
        let raw = json!({"choices": [{"content": "plain"}]});
        assert_eq!(extract_reply(&raw).as_deref(), Some("plain"));
    }

    #[test]
    fn test_choice_without_text_is_empty_reply() {
        let raw = json!({"choices": [{"finish_reason": "length"}]});
        assert_eq!(extract_reply(&raw).as_deref(), Some(""));
    }

    #[test]
    fn test_missing_or_empty_choices() {
        assert!(extract_reply(&json!({"choices": []})).is_none());
        assert!(extract_reply(&json!({"id": "x"})).is_none());
        assert!(extract_reply(&json!({"choices": [null]})).is_none());
    }

    #[test]
    fn test_scalar_first_choice_is_malformed() {
        for body in [
            r#"{"choices":[0]}"#,
            r#"{"choices":[false]}"#,
            r#"{"choices":[""]}"#,
            r#"{"choices":["x"]}"#,
        ] {
            match parse_completion(body) {
                Err(LlmError::MalformedResponse { raw }) => assert_eq!(raw, body),
                other => panic!("{} parsed as {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error":{"message":"bad key","code":"1001"}}"#;
        assert_eq!(error_message(401, body), "bad key");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(error_message(500, r#"{"error":{"message":""}}"#), "HTTP 500");
        assert_eq!(error_message(429, ""), "HTTP 429");
    }

    #[test]
    fn test_parse_completion_keeps_usage() {
        let body = r#"{
            "choices": [{"message": {"content": " hi "}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let response = parse_completion(body).unwrap();
        assert_eq!(response.content, "hi");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn test_parse_completion_rejects_non_json() {
        let err = parse_completion("not json").unwrap_err();
        match err {
            LlmError::MalformedResponse { raw } => assert_eq!(raw, "not json"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
