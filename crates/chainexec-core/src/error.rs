//! Classified RPC error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed taxonomy of JSON-RPC call failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcErrorKind {
    /// Connection refused, DNS failure, TLS error, transport timeout.
    RequestFailed,
    /// Non-200 HTTP status that is neither 429 nor 5xx.
    BadHttpStatus,
    /// HTTP 429 or a node-reported rate limit.
    RateLimited,
    /// HTTP 5xx or a node-reported temporary outage.
    Unavailable,
    /// Body is not valid JSON.
    InvalidResponse,
    /// Body parsed but is not a JSON object.
    InvalidObject,
    /// Node returned an `error` object we could not map to a transient class.
    ReturnedError,
    /// Response object has no `result` field.
    MissingResult,
    /// `result` is present but is not a string.
    InvalidResultType,
}

impl RpcErrorKind {
    /// Only transient upstream conditions may be answered from a stale cache record.
    pub fn is_stale_eligible(self) -> bool {
        matches!(self, Self::RateLimited | Self::Unavailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestFailed => "request_failed",
            Self::BadHttpStatus => "bad_http_status",
            Self::RateLimited => "rate_limited",
            Self::Unavailable => "unavailable",
            Self::InvalidResponse => "invalid_response",
            Self::InvalidObject => "invalid_object",
            Self::ReturnedError => "returned_error",
            Self::MissingResult => "missing_result",
            Self::InvalidResultType => "invalid_result_type",
        }
    }
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of a single JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RpcError {
    pub kind: RpcErrorKind,
    pub message: String,
    /// HTTP status of the reply, when one was received.
    pub http_status: Option<u16>,
    /// `error.code` of the JSON-RPC error object, when present.
    pub rpc_code: Option<i64>,
}

impl RpcError {
    pub fn new(kind: RpcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            rpc_code: None,
        }
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::new(RpcErrorKind::RequestFailed, message)
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_rpc_code(mut self, code: i64) -> Self {
        self.rpc_code = Some(code);
        self
    }

    pub fn is_stale_eligible(&self) -> bool {
        self.kind.is_stale_eligible()
    }
}
