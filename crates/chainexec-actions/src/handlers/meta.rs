//! `methodPolicy` and `listActions`: read-only introspection.

use async_trait::async_trait;
use chainexec_core::policy::{canonical_method, is_known_method, wire_method};
use serde_json::{json, Value};

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::params::Params;

/// Resolved caching policy for one method.
pub struct MethodPolicyAction;

#[async_trait]
impl ActionHandler for MethodPolicyAction {
    fn name(&self) -> &'static str {
        "methodPolicy"
    }

    fn remote_key(&self) -> &'static str {
        "method_policy"
    }

    async fn handle(&self, _ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let method = params.req_str(&["method"])?;
        Ok(json!({
            "method": canonical_method(&method),
            "wireMethod": wire_method(&method),
            "known": is_known_method(&method),
            "policy": chainexec_core::policy_for(&method),
        }))
    }
}

pub struct ListActions;

#[async_trait]
impl ActionHandler for ListActions {
    fn name(&self) -> &'static str {
        "listActions"
    }

    fn remote_key(&self) -> &'static str {
        "list_actions"
    }

    async fn handle(&self, ctx: &ActionContext, _params: &Params) -> Result<Value, ActionError> {
        Ok(json!({ "actions": ctx.catalog() }))
    }
}
