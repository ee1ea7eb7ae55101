//! Shared services handed to every action handler.

use std::sync::Arc;

use chainexec_core::{CacheStore, CachedRpcExecutor};
use chainexec_quote::QuoteRegistry;
use serde::Serialize;

/// Registered action names, exposed to `listActions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInfo {
    pub name: &'static str,
    pub remote_key: &'static str,
}

pub struct ActionContext {
    pub executor: Arc<CachedRpcExecutor>,
    pub quotes: Arc<dyn QuoteRegistry>,
    pub(crate) catalog: Vec<ActionInfo>,
}

impl ActionContext {
    pub fn new(executor: Arc<CachedRpcExecutor>, quotes: Arc<dyn QuoteRegistry>) -> Self {
        Self {
            executor,
            quotes,
            catalog: Vec::new(),
        }
    }

    /// The executor's cache store; `cachePut`/`cacheGet` share it with `rpcCallCached`.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        self.executor.store()
    }

    pub fn catalog(&self) -> &[ActionInfo] {
        &self.catalog
    }
}
