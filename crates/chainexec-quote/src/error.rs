//! Quote engine error types.

use thiserror::Error;

/// Errors that can occur while validating a quote request or selecting a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// A field is missing, malformed, or contradicts another field.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The combination is well-formed but not supported by policy.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// No candidate survived filtering.
    #[error("no route: {0}")]
    NoRoute(String),
}

impl QuoteError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
