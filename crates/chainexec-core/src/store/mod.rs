//! Cache store contract and backends.
//!
//! The executor depends only on [`CacheStore`]: a TTL-keyed `get`/`put` of
//! opaque JSON blobs. Records are overwritten on every put and never actively
//! deleted; expiry is advisory and interpreted by the reader.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// One cached value and its expiry.
///
/// Invariant: `expires_at_unix = written_at + ttl_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    pub key: String,
    pub value: Value,
    pub expires_at_unix: i64,
}

impl CacheRecord {
    pub fn new(key: impl Into<String>, value: Value, ttl_seconds: u64, now: i64) -> Self {
        Self {
            key: key.into(),
            value,
            expires_at_unix: expiry(now, ttl_seconds),
        }
    }

    /// `true` while `now <= expires_at_unix`.
    pub fn is_fresh(&self, now: i64) -> bool {
        now <= self.expires_at_unix
    }

    /// `true` while `now <= expires_at_unix + max_stale_seconds`.
    pub fn within_stale_window(&self, now: i64, max_stale_seconds: u64) -> bool {
        now <= expiry(self.expires_at_unix, max_stale_seconds)
    }
}

/// Classification of a direct cache read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Hit,
    Stale,
    Miss,
}

impl LookupStatus {
    pub fn of(record: Option<&CacheRecord>, now: i64) -> Self {
        match record {
            Some(r) if r.is_fresh(now) => Self::Hit,
            Some(_) => Self::Stale,
            None => Self::Miss,
        }
    }
}

/// TTL-keyed blob storage shared by all callers.
///
/// Concurrent writers to the same key are last-write-wins; no locking across
/// processes is assumed.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Fetch the record stored under `key`, expired or not.
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, StoreError>;

    /// Store `value` under `key`, expiring `ttl_seconds` after `now`.
    async fn put(
        &self,
        key: &str,
        ttl_seconds: u64,
        value: Value,
        now: i64,
    ) -> Result<CacheRecord, StoreError>;
}

/// Current wall-clock time in unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn expiry(base: i64, seconds: u64) -> i64 {
    base.saturating_add(i64::try_from(seconds).unwrap_or(i64::MAX))
}
