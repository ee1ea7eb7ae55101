//! Cached JSON-RPC executor with stale fallback.
//!
//! ```text
//! lookup(key)
//!   ├─ !strict && fresh record ──────────────→ cache_hit
//!   └─ fresh call
//!        ├─ ok  → put(key, ttl) → cache_refresh (unexpired record existed) | fresh
//!        └─ err → stale-eligible && allowed && within ttl+max_stale → stale
//!                 otherwise the classified error, unchanged
//! ```
//!
//! Callers never see data older than `ttl + max_stale` seconds.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache_key::cache_key_for_value;
use crate::config::ExecutorConfig;
use crate::error::RpcError;
use crate::policy::{policy_for, wire_method, MethodPolicy};
use crate::request::JsonRpcRequest;
use crate::store::{unix_now, CacheRecord, CacheStore};
use crate::transport::RpcTransport;

/// Where an [`RpcOutcome`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    CacheHit,
    CacheRefresh,
    Fresh,
    Stale,
}

impl OutcomeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CacheHit => "cache_hit",
            Self::CacheRefresh => "cache_refresh",
            Self::Fresh => "fresh",
            Self::Stale => "stale",
        }
    }
}

/// Result of one cached call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcOutcome {
    pub source: OutcomeSource,
    pub result: String,
    pub cache_key: String,
}

/// One call to execute, with optional per-call overrides of the method policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedCall {
    pub rpc_url: String,
    pub method: String,
    pub params: Value,
    /// Explicit cache key; derived from `(rpc_url, method, params)` when absent.
    pub cache_key: Option<String>,
    pub ttl_seconds: Option<u64>,
    pub max_stale_seconds: Option<u64>,
    pub allow_stale_fallback: Option<bool>,
}

impl CachedCall {
    pub fn new(rpc_url: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            method: method.into(),
            params,
            cache_key: None,
            ttl_seconds: None,
            max_stale_seconds: None,
            allow_stale_fallback: None,
        }
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn with_max_stale(mut self, max_stale_seconds: u64) -> Self {
        self.max_stale_seconds = Some(max_stale_seconds);
        self
    }

    pub fn with_stale_fallback(mut self, allow: bool) -> Self {
        self.allow_stale_fallback = Some(allow);
        self
    }

    /// The key this call reads and writes.
    pub fn resolved_key(&self) -> String {
        match self.cache_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => cache_key_for_value(&self.rpc_url, &self.method, &self.params),
        }
    }
}

/// Orchestrates transport, classifier, canonical keys and cache store.
pub struct CachedRpcExecutor {
    transport: Arc<dyn RpcTransport>,
    store: Arc<dyn CacheStore>,
    config: ExecutorConfig,
    next_id: AtomicU64,
}

impl CachedRpcExecutor {
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        store: Arc<dyn CacheStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Method policy with the call's overrides and the config default applied.
    pub fn resolve_policy(&self, call: &CachedCall) -> MethodPolicy {
        let base = policy_for(&call.method);
        MethodPolicy {
            ttl_seconds: call.ttl_seconds.unwrap_or(base.ttl_seconds),
            max_stale_seconds: call.max_stale_seconds.unwrap_or(base.max_stale_seconds),
            allow_stale_fallback: call
                .allow_stale_fallback
                .unwrap_or(base.allow_stale_fallback && self.config.allow_stale_fallback),
        }
    }

    /// Execute `call` against the current wall clock.
    pub async fn execute(&self, call: &CachedCall) -> Result<RpcOutcome, RpcError> {
        self.execute_at(call, unix_now()).await
    }

    /// Execute `call` as if the current time were `now` (unix seconds).
    pub async fn execute_at(&self, call: &CachedCall, now: i64) -> Result<RpcOutcome, RpcError> {
        let key = call.resolved_key();
        let policy = self.resolve_policy(call);
        let cached = self.load(&key).await;
        let fresh_record = cached.as_ref().is_some_and(|(r, _)| r.is_fresh(now));

        if !self.config.strict_mode && fresh_record {
            if let Some((_, result)) = &cached {
                tracing::debug!(cache_key = %key, "cache hit");
                return Ok(RpcOutcome {
                    source: OutcomeSource::CacheHit,
                    result: result.clone(),
                    cache_key: key,
                });
            }
        }

        let params = match &call.params {
            Value::Null => Value::Array(vec![]),
            other => other.clone(),
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, wire_method(&call.method), params);

        match self.transport.call(&call.rpc_url, &req).await {
            Ok(result) => {
                let value = json!({ "result": result, "fetchedAtUnix": now });
                if let Err(e) = self.store.put(&key, policy.ttl_seconds, value, now).await {
                    tracing::warn!(cache_key = %key, error = %e, "failed to write cache record");
                }
                let source = if fresh_record {
                    OutcomeSource::CacheRefresh
                } else {
                    OutcomeSource::Fresh
                };
                tracing::debug!(cache_key = %key, source = source.as_str(), "fetched from node");
                Ok(RpcOutcome {
                    source,
                    result,
                    cache_key: key,
                })
            }
            Err(err) => {
                if policy.allow_stale_fallback && err.is_stale_eligible() {
                    if let Some((record, result)) = cached {
                        if record.within_stale_window(now, policy.max_stale_seconds) {
                            tracing::warn!(
                                cache_key = %key,
                                error = %err,
                                expired_for = now - record.expires_at_unix,
                                "serving stale cache record"
                            );
                            return Ok(RpcOutcome {
                                source: OutcomeSource::Stale,
                                result,
                                cache_key: key,
                            });
                        }
                    }
                }
                tracing::debug!(cache_key = %key, error = %err, "rpc call failed");
                Err(err)
            }
        }
    }

    /// Read a record and its cached `result` string. Store failures and
    /// records that do not hold a result are treated as a miss.
    async fn load(&self, key: &str) -> Option<(CacheRecord, String)> {
        let record = match self.store.get(key).await {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "failed to read cache record");
                return None;
            }
        };
        match record.value.get("result").and_then(Value::as_str) {
            Some(result) => {
                let result = result.to_string();
                Some((record, result))
            }
            None => {
                tracing::debug!(cache_key = %key, "cache record has no result string");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcErrorKind;
    use crate::request::HttpReply;
    use crate::store::{MemoryCacheStore, StoreError};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const URL: &str = "https://rpc.example.com";

    struct MockTransport {
        reply: Result<HttpReply, RpcError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<JsonRpcRequest>>,
    }

    impl MockTransport {
        fn replying(reply: Result<HttpReply, RpcError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn ok(result: &str) -> Arc<Self> {
            Self::replying(Ok(HttpReply::ok_result(result)))
        }

        fn status(status: u16) -> Arc<Self> {
            Self::replying(Ok(HttpReply::new(status, "")))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn post(&self, _url: &str, req: &JsonRpcRequest) -> Result<HttpReply, RpcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(req.clone());
            self.reply.clone()
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<CacheRecord>, StoreError> {
            Err(StoreError::Other("disk on fire".into()))
        }

        async fn put(
            &self,
            _key: &str,
            _ttl: u64,
            _value: Value,
            _now: i64,
        ) -> Result<CacheRecord, StoreError> {
            Err(StoreError::Other("disk on fire".into()))
        }
    }

    fn executor(
        transport: Arc<MockTransport>,
        store: Arc<MemoryCacheStore>,
        config: ExecutorConfig,
    ) -> CachedRpcExecutor {
        CachedRpcExecutor::new(transport, store, config)
    }

    fn block_number() -> CachedCall {
        // ttl 10, stale window 20
        CachedCall::new(URL, "eth_blockNumber", json!([]))
            .with_ttl(10)
            .with_max_stale(20)
            .with_stale_fallback(true)
    }

    async fn seed(store: &MemoryCacheStore, call: &CachedCall, result: &str, written_at: i64) {
        store
            .put(&call.resolved_key(), 10, json!({ "result": result, "fetchedAtUnix": written_at }), written_at)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn miss_fetches_and_persists() {
        let transport = MockTransport::ok("0x10");
        let store = Arc::new(MemoryCacheStore::new());
        let exec = executor(transport.clone(), store.clone(), ExecutorConfig::default());

        let outcome = exec.execute_at(&block_number(), 1_000).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
        assert_eq!(outcome.result, "0x10");
        assert_eq!(transport.calls(), 1);

        let record = store.get(&outcome.cache_key).await.unwrap().unwrap();
        assert_eq!(record.value["result"], "0x10");
        assert_eq!(record.value["fetchedAtUnix"], 1_000);
        assert_eq!(record.expires_at_unix, 1_010);
    }

    #[tokio::test]
    async fn fresh_record_is_a_hit_without_transport() {
        let transport = MockTransport::ok("0x99");
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport.clone(), store, ExecutorConfig::default());
        let outcome = exec.execute_at(&call, 1_010).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::CacheHit);
        assert_eq!(outcome.result, "0x10");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn expired_record_is_refetched_as_fresh() {
        let transport = MockTransport::ok("0x11");
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport.clone(), store, ExecutorConfig::default());
        let outcome = exec.execute_at(&call, 1_011).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
        assert_eq!(outcome.result, "0x11");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn strict_mode_with_unexpired_record_is_a_refresh() {
        let transport = MockTransport::ok("0x11");
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport.clone(), store, ExecutorConfig::strict());
        let outcome = exec.execute_at(&call, 1_005).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::CacheRefresh);
        assert_eq!(outcome.result, "0x11");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn strict_mode_with_expired_record_is_fresh() {
        let transport = MockTransport::ok("0x11");
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport, store, ExecutorConfig::strict());
        let outcome = exec.execute_at(&call, 1_020).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
    }

    #[tokio::test]
    async fn unavailable_within_window_serves_stale() {
        let transport = MockTransport::status(503);
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport.clone(), store, ExecutorConfig::default());
        // expires 1_010, stale until 1_030
        let outcome = exec.execute_at(&call, 1_030).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Stale);
        assert_eq!(outcome.result, "0x10");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn unavailable_beyond_window_propagates() {
        let transport = MockTransport::status(503);
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport, store, ExecutorConfig::default());
        let err = exec.execute_at(&call, 1_031).await.unwrap_err();
        assert_eq!(err.kind, RpcErrorKind::Unavailable);
        assert_eq!(err.http_status, Some(503));
    }

    #[tokio::test]
    async fn rate_limited_serves_stale() {
        let transport = MockTransport::replying(Ok(HttpReply::new(
            200,
            r#"{"error":{"code":-32005,"message":"limit"}}"#,
        )));
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport, store, ExecutorConfig::default());
        let outcome = exec.execute_at(&call, 1_015).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Stale);
    }

    #[tokio::test]
    async fn hard_failures_never_fall_back() {
        let transport = MockTransport::replying(Err(RpcError::request_failed("connection refused")));
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport, store, ExecutorConfig::default());
        let err = exec.execute_at(&call, 1_015).await.unwrap_err();
        assert_eq!(err.kind, RpcErrorKind::RequestFailed);
    }

    #[tokio::test]
    async fn stale_fallback_disabled_propagates() {
        let transport = MockTransport::status(429);
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number().with_stale_fallback(false);
        seed(&store, &call, "0x10", 1_000).await;

        let exec = executor(transport, store, ExecutorConfig::default());
        let err = exec.execute_at(&call, 1_015).await.unwrap_err();
        assert_eq!(err.kind, RpcErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn failure_without_record_propagates() {
        let exec = executor(
            MockTransport::status(503),
            Arc::new(MemoryCacheStore::new()),
            ExecutorConfig::default(),
        );
        let err = exec.execute_at(&block_number(), 0).await.unwrap_err();
        assert_eq!(err.kind, RpcErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn config_default_gates_policy_stale_fallback() {
        let exec = executor(
            MockTransport::ok("0x1"),
            Arc::new(MemoryCacheStore::new()),
            ExecutorConfig {
                strict_mode: false,
                allow_stale_fallback: false,
            },
        );
        let call = CachedCall::new(URL, "eth_blockNumber", json!([]));
        assert!(!exec.resolve_policy(&call).allow_stale_fallback);
        // An explicit per-call flag wins over the config default.
        assert!(exec.resolve_policy(&call.with_stale_fallback(true)).allow_stale_fallback);
    }

    #[tokio::test]
    async fn method_policy_applies_without_overrides() {
        let exec = executor(
            MockTransport::ok("0x1"),
            Arc::new(MemoryCacheStore::new()),
            ExecutorConfig::default(),
        );
        let call = CachedCall::new(URL, "eth_chainId", json!([]));
        assert_eq!(exec.resolve_policy(&call), policy_for("eth_chainId"));
    }

    #[tokio::test]
    async fn explicit_cache_key_is_used() {
        let transport = MockTransport::ok("0x1");
        let store = Arc::new(MemoryCacheStore::new());
        let exec = executor(transport, store.clone(), ExecutorConfig::default());

        let call = block_number().with_cache_key("my-key");
        let outcome = exec.execute_at(&call, 0).await.unwrap();
        assert_eq!(outcome.cache_key, "my-key");
        assert!(store.get("my-key").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn alias_spelling_goes_out_canonical() {
        let transport = MockTransport::ok("0x1");
        let exec = executor(transport.clone(), Arc::new(MemoryCacheStore::new()), ExecutorConfig::default());

        let call = CachedCall::new(URL, "BLOCKNUMBER", Value::Null);
        exec.execute_at(&call, 0).await.unwrap();

        let req = transport.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(req.method, "eth_blockNumber");
        assert_eq!(req.params, json!([]));
    }

    #[tokio::test]
    async fn record_without_result_is_a_miss() {
        let transport = MockTransport::ok("0x2");
        let store = Arc::new(MemoryCacheStore::new());
        let call = block_number();
        store.put(&call.resolved_key(), 60, json!({ "other": 1 }), 0).await.unwrap();

        let exec = executor(transport.clone(), store, ExecutorConfig::default());
        let outcome = exec.execute_at(&call, 1).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn broken_store_degrades_to_uncached() {
        let transport = MockTransport::ok("0x3");
        let exec = CachedRpcExecutor::new(transport.clone(), Arc::new(BrokenStore), ExecutorConfig::default());

        let outcome = exec.execute_at(&block_number(), 0).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
        assert_eq!(outcome.result, "0x3");
    }

    #[tokio::test]
    async fn large_integer_params_reach_the_node_unchanged() {
        let transport = MockTransport::ok("0x1");
        let exec = executor(transport.clone(), Arc::new(MemoryCacheStore::new()), ExecutorConfig::default());
        let params: Value = serde_json::from_str("[18446744073709551617, {\"n\": 340282366920938463463374607431768211455}]").unwrap();
        let call = CachedCall::new(URL, "custom_bigMath", params);

        exec.execute_at(&call, 0).await.unwrap();
        let sent = transport.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(
            serde_json::to_string(&sent.params).unwrap(),
            r#"[18446744073709551617,{"n":340282366920938463463374607431768211455}]"#
        );
    }

    #[tokio::test]
    async fn distinct_large_integers_do_not_share_a_record() {
        let store = Arc::new(MemoryCacheStore::new());
        let first = MockTransport::ok("0xa");
        let exec = executor(first, store.clone(), ExecutorConfig::default());
        let call = |text: &str| CachedCall::new(URL, "eth_call", serde_json::from_str(text).unwrap());
        exec.execute_at(&call("[18446744073709551616]"), 0).await.unwrap();

        let second = MockTransport::ok("0xb");
        let exec = executor(second.clone(), store, ExecutorConfig::default());
        let outcome = exec.execute_at(&call("[18446744073709551617]"), 1).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Fresh);
        assert_eq!(outcome.result, "0xb");
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn outcome_source_wire_names() {
        assert_eq!(serde_json::to_value(OutcomeSource::CacheHit).unwrap(), "cache_hit");
        assert_eq!(serde_json::to_value(OutcomeSource::CacheRefresh).unwrap(), "cache_refresh");
        assert_eq!(OutcomeSource::Stale.as_str(), "stale");
    }
}
