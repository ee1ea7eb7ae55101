//! `rpcCallCached`: one JSON-RPC call through the cached executor.

use async_trait::async_trait;
use chainexec_core::{cache_key, canonical_json, CachedCall};
use serde_json::{json, Value};
use tracing::debug;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::params::Params;

/// Cached JSON-RPC call with stale fallback.
pub struct RpcCallCached;

#[async_trait]
impl ActionHandler for RpcCallCached {
    fn name(&self) -> &'static str {
        "rpcCallCached"
    }

    fn remote_key(&self) -> &'static str {
        "rpc_call_cached"
    }

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let rpc_url = params.req_str(&["rpcUrl", "rpc_url", "url"])?;
        let method = params.req_str(&["method"])?;
        let RpcParams { value, text } = rpc_params(params)?;

        // Params given as JSON text are keyed from that text.
        let key = match params.opt_str(&["cacheKey", "cache_key"])? {
            Some(key) => Some(key),
            None => text.map(|text| cache_key(&rpc_url, &method, &text)),
        };

        let mut call = CachedCall::new(rpc_url, method, value);
        if let Some(key) = key {
            call = call.with_cache_key(key);
        }
        if let Some(ttl) = params.opt_u64(&["ttlSeconds", "ttl"])? {
            call = call.with_ttl(ttl);
        }
        if let Some(max_stale) = params.opt_u64(&["maxStaleSeconds", "maxStale"])? {
            call = call.with_max_stale(max_stale);
        }
        if let Some(allow) = params.opt_bool(&["allowStaleFallback", "allowStale"])? {
            call = call.with_stale_fallback(allow);
        }

        let outcome = ctx.executor.execute(&call).await?;
        debug!(source = %outcome.source.as_str(), key = %outcome.cache_key, "rpcCallCached done");
        Ok(json!({
            "source": outcome.source.as_str(),
            "result": outcome.result,
            "cacheKey": outcome.cache_key,
        }))
    }
}

#[derive(Debug, PartialEq)]
struct RpcParams {
    value: Value,
    /// Trimmed JSON text, when params arrived as text.
    text: Option<String>,
}

/// JSON-RPC params from `params` and/or `paramsJson`. Each may be an
/// array, an object or JSON text; when both are given they must mean the
/// same thing. Absent means `[]`.
fn rpc_params(params: &Params) -> Result<RpcParams, ActionError> {
    let structured = params_field(params, "params")?;
    let text = params_field(params, "paramsJson")?;

    let chosen = match (structured, text) {
        (Some(a), Some(b)) if canonical_json(&a.value) != canonical_json(&b.value) => {
            return Err(ActionError::validation("params and paramsJson disagree"));
        }
        (Some(a), Some(b)) => RpcParams {
            text: a.text.or(b.text),
            value: a.value,
        },
        (Some(one), None) | (None, Some(one)) => one,
        (None, None) => RpcParams {
            value: json!([]),
            text: None,
        },
    };
    Ok(chosen)
}

fn params_field(params: &Params, name: &str) -> Result<Option<RpcParams>, ActionError> {
    match params.value(&[name])? {
        None => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => {
            let text = text.trim();
            let value = serde_json::from_str(text).map_err(|e| {
                ActionError::validation(format!("{name} is not valid JSON: {e}"))
            })?;
            Ok(Some(RpcParams {
                value,
                text: Some(text.to_string()),
            }))
        }
        Some(v @ (Value::Array(_) | Value::Object(_))) => Ok(Some(RpcParams {
            value: v.clone(),
            text: None,
        })),
        Some(other) => Err(ActionError::validation(format!(
            "{name} must be an array, an object or JSON text (got {other})"
        ))),
    }
}
