//! JSON-RPC 2.0 wire types.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON-RPC request ID: a string, a number or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

// Decoded through `Value`: untagged derives cannot see numbers when
// serde_json's arbitrary_precision is on.
impl<'de> Deserialize<'de> for RpcId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::Null),
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => n
                .as_u64()
                .map(Self::Number)
                .ok_or_else(|| de::Error::custom(format!("id must be a non-negative integer (got {n})"))),
            other => Err(de::Error::custom(format!("invalid JSON-RPC id: {other}"))),
        }
    }
}

/// A JSON-RPC 2.0 request.
///
/// `params` is kept as a raw JSON value so that both positional (array) and
/// by-name (object) parameter styles pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }
}

/// The raw HTTP reply to a JSON-RPC POST, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A `200 OK` reply carrying a well-formed `{"result": "<result>"}` body.
    pub fn ok_result(result: &str) -> Self {
        let body = serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": result });
        Self::new(200, body.to_string())
    }
}
