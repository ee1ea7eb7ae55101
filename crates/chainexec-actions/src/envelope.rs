//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActionError;

/// `{action, params}` as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub params: Value,
    /// Return the bare result on success instead of the envelope.
    #[serde(default)]
    pub results_only: bool,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, params: Value) -> Self {
        Self {
            action: action.into(),
            params,
            results_only: false,
        }
    }

    /// The request flag or a `resultsOnly: true` inside params.
    pub fn wants_results_only(&self) -> bool {
        self.results_only
            || self
                .params
                .get("resultsOnly")
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Ok,
    Error,
    Blocked,
}

/// `{status, code, result | reason}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: ActionStatus,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Envelope {
    pub fn ok(result: Value) -> Self {
        Self {
            status: ActionStatus::Ok,
            code: 200,
            result: Some(result),
            reason: None,
            kind: None,
        }
    }

    pub fn from_error(err: &ActionError) -> Self {
        Self {
            status: err.status(),
            code: err.code(),
            result: None,
            reason: Some(err.to_string()),
            kind: Some(err.kind().to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ActionStatus::Ok
    }

    /// Final shape returned to the caller. Applied once for every action.
    pub fn into_output(self, results_only: bool) -> Value {
        match self {
            Envelope {
                status: ActionStatus::Ok,
                result: Some(result),
                ..
            } if results_only => result,
            envelope => serde_json::to_value(envelope).unwrap_or(Value::Null),
        }
    }
}
