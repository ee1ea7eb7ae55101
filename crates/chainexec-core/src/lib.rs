//! chainexec-core: cached JSON-RPC execution for ChainExec.
//!
//! # Overview
//!
//! The core crate turns a `(url, method, params)` call into a cached, policy
//! driven round trip with stale fallback:
//!
//! - [`RpcTransport`]: async trait issuing one JSON-RPC POST
//! - [`classify`]: maps HTTP status / RPC error payloads to [`RpcErrorKind`]
//! - [`cache_key`]: deterministic keys independent of key order and address case
//! - [`CacheStore`]: TTL-keyed blob store ([`MemoryCacheStore`], [`FileCacheStore`])
//! - [`policy`]: per-method TTL / stale-window table
//! - [`CachedRpcExecutor`]: the orchestrator

pub mod cache_key;
pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod policy;
pub mod request;
pub mod store;
pub mod transport;

pub use cache_key::{cache_key, canonical_json, normalize_url};
pub use config::ExecutorConfig;
pub use error::{RpcError, RpcErrorKind};
pub use executor::{CachedCall, CachedRpcExecutor, OutcomeSource, RpcOutcome};
pub use policy::{canonical_method, policy_for, MethodPolicy};
pub use request::{HttpReply, JsonRpcRequest, RpcId};
pub use store::{
    unix_now, CacheRecord, CacheStore, FileCacheStore, LookupStatus, MemoryCacheStore, StoreError,
};
pub use transport::RpcTransport;
