//! Deterministic cache keys for JSON-RPC calls.
//!
//! A key has the form `"<url>|<method>|<params>"`. Two calls that differ only
//! in object key order, address casing, URL trailing slashes or method alias
//! spelling map to the same key.

use serde_json::Value;

use crate::policy::canonical_method;

/// Derive the cache key for `(rpc_url, method, params_text)`.
///
/// `params_text` is parsed as JSON; if it does not parse, the trimmed raw text
/// is used instead of failing.
pub fn cache_key(rpc_url: &str, method: &str, params_text: &str) -> String {
    let params = match serde_json::from_str::<Value>(params_text) {
        Ok(value) => canonical_json(&value),
        Err(_) => params_text.trim().to_string(),
    };
    format!(
        "{}|{}|{}",
        normalize_url(rpc_url),
        canonical_method(method),
        params
    )
}

/// Same as [`cache_key`] for an already-parsed params value.
pub fn cache_key_for_value(rpc_url: &str, method: &str, params: &Value) -> String {
    format!(
        "{}|{}|{}",
        normalize_url(rpc_url),
        canonical_method(method),
        canonical_json(params)
    )
}

/// Trim whitespace and strip trailing `/`, never shortening below one character.
pub fn normalize_url(url: &str) -> &str {
    let mut out = url.trim();
    while out.len() > 1 && out.ends_with('/') {
        out = &out[..out.len() - 1];
    }
    out
}

/// Serialize `value` with sorted object keys and lowercased address strings.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_json_string(key, out);
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) if is_address(s) => push_json_string(&s.to_ascii_lowercase(), out),
        Value::String(s) => push_json_string(s, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn push_json_string(s: &str, out: &mut String) {
    // Serializing a &str cannot fail.
    out.push_str(&Value::String(s.to_string()).to_string());
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s.as_bytes()[2..].iter().all(u8::is_ascii_hexdigit)
}
