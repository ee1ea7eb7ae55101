//! The `ActionHandler` trait every action implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::params::Params;

/// One named action. Handlers return the bare result; the dispatcher wraps it.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// camelCase name, e.g. `rpcCallCached`.
    fn name(&self) -> &'static str;

    /// snake_case remote key, e.g. `rpc_call_cached`.
    fn remote_key(&self) -> &'static str;

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError>;
}
