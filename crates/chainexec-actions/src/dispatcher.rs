//! Envelope in, envelope out.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

use crate::context::ActionContext;
use crate::envelope::{ActionRequest, Envelope};
use crate::error::ActionError;
use crate::params::Params;
use crate::registry::ActionRegistry;

pub struct Dispatcher {
    registry: ActionRegistry,
    ctx: ActionContext,
    blocked: HashSet<String>,
}

impl Dispatcher {
    pub fn new(registry: ActionRegistry, mut ctx: ActionContext) -> Self {
        ctx.catalog = registry.catalog();
        Self {
            registry,
            ctx,
            blocked: HashSet::new(),
        }
    }

    /// Actions that answer `blocked` without running. Matched by name or remote key.
    pub fn with_blocked<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked = actions
            .into_iter()
            .map(|a| a.as_ref().trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run one request and shape the output, honouring `resultsOnly`.
    pub async fn dispatch(&self, request: ActionRequest) -> Value {
        let results_only = request.wants_results_only();
        self.dispatch_envelope(request).await.into_output(results_only)
    }

    /// Run one request and return the envelope unshaped.
    pub async fn dispatch_envelope(&self, request: ActionRequest) -> Envelope {
        let span = info_span!("action", action = %request.action);
        async move {
            match self.run(request).await {
                Ok(result) => {
                    debug!("action ok");
                    Envelope::ok(result)
                }
                Err(err) => {
                    warn!(code = err.code(), kind = err.kind(), error = %err, "action failed");
                    Envelope::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: ActionRequest) -> Result<Value, ActionError> {
        let handler = self
            .registry
            .get(&request.action)
            .ok_or_else(|| ActionError::UnknownAction(request.action.trim().to_string()))?;

        if self.blocked.contains(handler.name()) || self.blocked.contains(handler.remote_key()) {
            return Err(ActionError::Blocked(handler.name().to_string()));
        }

        let params = Params::from_value(request.params)?;
        handler.handle(&self.ctx, &params).await
    }
}
