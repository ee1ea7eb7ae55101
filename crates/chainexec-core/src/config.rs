//! Executor configuration.

use serde::{Deserialize, Serialize};

/// Process-wide switches threaded explicitly into the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Bypass cache hits and force a round trip on every call.
    #[serde(default)]
    pub strict_mode: bool,
    /// Default for stale fallback when a call does not say; ANDed with the
    /// method policy.
    #[serde(default = "bool_true")]
    pub allow_stale_fallback: bool,
}

fn bool_true() -> bool {
    true
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            allow_stale_fallback: true,
        }
    }
}

impl ExecutorConfig {
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }
}
