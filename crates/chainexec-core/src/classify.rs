//! Maps HTTP replies and JSON-RPC error payloads into [`RpcErrorKind`].
//!
//! Rules are evaluated in order; the first match wins:
//!
//! ```text
//! HTTP 429            → RateLimited
//! HTTP >= 500         → Unavailable
//! HTTP != 200         → BadHttpStatus
//! body not JSON       → InvalidResponse
//! body not an object  → InvalidObject
//! error object        → by code, then by message text, else ReturnedError
//! no result           → MissingResult
//! result not a string → InvalidResultType
//! ```

use serde_json::{Map, Value};

use crate::error::{RpcError, RpcErrorKind};
use crate::request::HttpReply;

const RATE_LIMIT_CODES: &[i64] = &[429, -32005];
const UNAVAILABLE_CODES: &[i64] = &[-32000, -32004];

const RATE_LIMIT_PHRASES: &[&str] = &["rate limit", "too many"];
const UNAVAILABLE_PHRASES: &[&str] = &["temporarily unavailable", "service unavailable", "timeout"];

/// Classify an HTTP status alone. Returns `None` for `200`.
pub fn classify_status(status: u16) -> Option<RpcErrorKind> {
    match status {
        200 => None,
        429 => Some(RpcErrorKind::RateLimited),
        s if s >= 500 => Some(RpcErrorKind::Unavailable),
        _ => Some(RpcErrorKind::BadHttpStatus),
    }
}

/// Classify a JSON-RPC `error` member by its code and then its message.
pub fn classify_rpc_error(code: Option<i64>, message: &str) -> RpcErrorKind {
    if let Some(code) = code {
        if RATE_LIMIT_CODES.contains(&code) {
            return RpcErrorKind::RateLimited;
        }
        if UNAVAILABLE_CODES.contains(&code) {
            return RpcErrorKind::Unavailable;
        }
    }

    let lowered = message.to_lowercase();
    if RATE_LIMIT_PHRASES.iter().any(|p| lowered.contains(p)) {
        RpcErrorKind::RateLimited
    } else if UNAVAILABLE_PHRASES.iter().any(|p| lowered.contains(p)) {
        RpcErrorKind::Unavailable
    } else {
        RpcErrorKind::ReturnedError
    }
}

/// Turn a raw HTTP reply into the `result` string or a classified error.
pub fn classify_reply(reply: &HttpReply) -> Result<String, RpcError> {
    if let Some(kind) = classify_status(reply.status) {
        return Err(RpcError::new(kind, format!("HTTP {}: {}", reply.status, excerpt(&reply.body)))
            .with_http_status(reply.status));
    }

    let parsed: Value = serde_json::from_str(&reply.body).map_err(|e| {
        RpcError::new(RpcErrorKind::InvalidResponse, format!("body is not JSON: {e}"))
            .with_http_status(reply.status)
    })?;

    let Value::Object(object) = parsed else {
        return Err(RpcError::new(
            RpcErrorKind::InvalidObject,
            format!("body is not a JSON object: {}", excerpt(&reply.body)),
        )
        .with_http_status(reply.status));
    };

    if let Some(err) = error_member(&object) {
        return Err(err.with_http_status(reply.status));
    }

    match object.get("result") {
        None => Err(RpcError::new(RpcErrorKind::MissingResult, "response has no result")
            .with_http_status(reply.status)),
        Some(Value::String(result)) => Ok(result.clone()),
        Some(other) => Err(RpcError::new(
            RpcErrorKind::InvalidResultType,
            format!("result is not a string: {}", json_type(other)),
        )
        .with_http_status(reply.status)),
    }
}

fn error_member(object: &Map<String, Value>) -> Option<RpcError> {
    match object.get("error")? {
        Value::Null => None,
        Value::Object(err) => {
            let code = err.get("code").and_then(Value::as_i64);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let kind = classify_rpc_error(code, &message);
            let text = match code {
                Some(c) => format!("RPC error {c}: {message}"),
                None => format!("RPC error: {message}"),
            };
            let err = RpcError::new(kind, text);
            Some(match code {
                Some(c) => err.with_rpc_code(c),
                None => err,
            })
        }
        other => {
            let message = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
            Some(RpcError::new(classify_rpc_error(None, &message), format!("RPC error: {message}")))
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(body: &str) -> &str {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        return trimmed;
    }
    let mut end = MAX;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    &trimmed[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(status: u16, body: &str) -> RpcErrorKind {
        classify_reply(&HttpReply::new(status, body)).unwrap_err().kind
    }

    #[test]
    fn status_rules() {
        assert_eq!(kind_of(429, ""), RpcErrorKind::RateLimited);
        assert_eq!(kind_of(500, ""), RpcErrorKind::Unavailable);
        assert_eq!(kind_of(503, "{}"), RpcErrorKind::Unavailable);
        assert_eq!(kind_of(404, "not found"), RpcErrorKind::BadHttpStatus);
        assert_eq!(kind_of(201, r#"{"result":"0x1"}"#), RpcErrorKind::BadHttpStatus);
    }

    #[test]
    fn status_is_recorded() {
        let err = classify_reply(&HttpReply::new(502, "bad gateway")).unwrap_err();
        assert_eq!(err.http_status, Some(502));
        assert!(err.message.contains("bad gateway"));
    }

    #[test]
    fn body_shape_rules() {
        assert_eq!(kind_of(200, "<html>"), RpcErrorKind::InvalidResponse);
        assert_eq!(kind_of(200, "[1,2]"), RpcErrorKind::InvalidObject);
        assert_eq!(kind_of(200, r#""0x1""#), RpcErrorKind::InvalidObject);
        assert_eq!(kind_of(200, r#"{"jsonrpc":"2.0","id":1}"#), RpcErrorKind::MissingResult);
        assert_eq!(kind_of(200, r#"{"result":{"number":"0x1"}}"#), RpcErrorKind::InvalidResultType);
        assert_eq!(kind_of(200, r#"{"result":null}"#), RpcErrorKind::InvalidResultType);
    }

    #[test]
    fn error_codes() {
        let body = |code: i64| format!(r#"{{"error":{{"code":{code},"message":"x"}}}}"#);
        assert_eq!(kind_of(200, &body(429)), RpcErrorKind::RateLimited);
        assert_eq!(kind_of(200, &body(-32005)), RpcErrorKind::RateLimited);
        assert_eq!(kind_of(200, &body(-32000)), RpcErrorKind::Unavailable);
        assert_eq!(kind_of(200, &body(-32004)), RpcErrorKind::Unavailable);
        assert_eq!(kind_of(200, &body(-32602)), RpcErrorKind::ReturnedError);
    }

    #[test]
    fn error_messages() {
        let body = |msg: &str| format!(r#"{{"error":{{"code":-1,"message":"{msg}"}}}}"#);
        assert_eq!(kind_of(200, &body("Rate Limit exceeded")), RpcErrorKind::RateLimited);
        assert_eq!(kind_of(200, &body("Too Many requests")), RpcErrorKind::RateLimited);
        assert_eq!(kind_of(200, &body("Service Unavailable")), RpcErrorKind::Unavailable);
        assert_eq!(kind_of(200, &body("upstream timeout")), RpcErrorKind::Unavailable);
        assert_eq!(
            kind_of(200, &body("node temporarily unavailable")),
            RpcErrorKind::Unavailable
        );
        assert_eq!(kind_of(200, &body("execution reverted")), RpcErrorKind::ReturnedError);
    }

    #[test]
    fn error_code_wins_over_message() {
        let body = r#"{"error":{"code":-32000,"message":"rate limit"}}"#;
        assert_eq!(kind_of(200, body), RpcErrorKind::Unavailable);
    }

    #[test]
    fn error_takes_precedence_over_result() {
        let body = r#"{"result":"0x1","error":{"code":3,"message":"execution reverted"}}"#;
        let err = classify_reply(&HttpReply::new(200, body)).unwrap_err();
        assert_eq!(err.kind, RpcErrorKind::ReturnedError);
        assert_eq!(err.rpc_code, Some(3));
    }

    #[test]
    fn null_error_is_ignored() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":"0x2a","error":null}"#;
        assert_eq!(classify_reply(&HttpReply::new(200, body)).unwrap(), "0x2a");
    }

    #[test]
    fn string_result_is_returned() {
        assert_eq!(classify_reply(&HttpReply::ok_result("0x1234")).unwrap(), "0x1234");
    }
}
