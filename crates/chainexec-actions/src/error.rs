//! Action-level errors and their envelope codes.

use chainexec_core::error::{RpcError, RpcErrorKind};
use chainexec_core::store::StoreError;
use chainexec_quote::QuoteError;
use thiserror::Error;

use crate::envelope::ActionStatus;

/// Why an action did not produce a result.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Missing or malformed field; surfaced verbatim, never retried.
    #[error("{0}")]
    Validation(String),

    /// Well-formed but disallowed combination.
    #[error("{0}")]
    Unsupported(String),

    /// No quote candidate survived filtering.
    #[error("{0}")]
    NoRoute(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// Disabled by configuration.
    #[error("action {0} is blocked by configuration")]
    Blocked(String),
}

impl ActionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Envelope status for this error.
    pub fn status(&self) -> ActionStatus {
        match self {
            Self::Blocked(_) => ActionStatus::Blocked,
            _ => ActionStatus::Error,
        }
    }

    /// HTTP-style envelope code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Blocked(_) => 403,
            Self::UnknownAction(_) | Self::NoRoute(_) => 404,
            Self::Unsupported(_) => 422,
            Self::Rpc(e) => match e.kind {
                RpcErrorKind::RateLimited => 429,
                RpcErrorKind::Unavailable => 503,
                _ => 502,
            },
            Self::Store(_) | Self::Encode(_) => 500,
        }
    }

    /// Machine-readable error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unsupported(_) => "unsupported",
            Self::NoRoute(_) => "no_route",
            Self::Rpc(e) => e.kind.as_str(),
            Self::Store(_) => "store",
            Self::Encode(_) => "internal",
            Self::UnknownAction(_) => "unknown_action",
            Self::Blocked(_) => "blocked",
        }
    }
}

impl From<QuoteError> for ActionError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Validation(msg) => Self::Validation(msg),
            QuoteError::Unsupported(msg) => Self::Unsupported(msg),
            QuoteError::NoRoute(msg) => Self::NoRoute(msg),
        }
    }
}

/// Registry construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate action name or remote key {key:?} (registered by {first} and {second})")]
    Duplicate {
        key: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("action {0} has an empty name or remote key")]
    EmptyKey(&'static str),
}
