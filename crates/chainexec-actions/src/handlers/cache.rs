//! `cachePut` and `cacheGet`: direct access to the response cache.

use async_trait::async_trait;
use chainexec_core::{unix_now, LookupStatus};
use serde_json::{json, Value};

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::params::Params;

const KEY: &[&str] = &["key", "cacheKey"];

/// Raw write into the shared cache store.
pub struct CachePut;

#[async_trait]
impl ActionHandler for CachePut {
    fn name(&self) -> &'static str {
        "cachePut"
    }

    fn remote_key(&self) -> &'static str {
        "cache_put"
    }

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let key = params.req_str(KEY)?;
        let ttl = params
            .opt_u64(&["ttlSeconds", "ttl"])?
            .ok_or_else(|| ActionError::validation("ttlSeconds is required"))?;
        let value = params
            .value(&["value"])?
            .cloned()
            .ok_or_else(|| ActionError::validation("value is required"))?;

        let record = ctx.store().put(&key, ttl, value, unix_now()).await?;
        Ok(json!({ "key": record.key, "expiresAtUnix": record.expires_at_unix }))
    }
}

/// Raw read, classified as hit, stale or miss.
pub struct CacheGet;

#[async_trait]
impl ActionHandler for CacheGet {
    fn name(&self) -> &'static str {
        "cacheGet"
    }

    fn remote_key(&self) -> &'static str {
        "cache_get"
    }

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let key = params.req_str(KEY)?;
        let record = ctx.store().get(&key).await?;
        let status = LookupStatus::of(record.as_ref(), unix_now());

        Ok(match record {
            Some(record) => json!({
                "key": key,
                "status": status,
                "value": record.value,
                "expiresAtUnix": record.expires_at_unix,
            }),
            None => json!({ "key": key, "status": status }),
        })
    }
}
