//! In-memory cache backend.
//!
//! Useful for tests and for embedding the executor in a long-lived process.
//! All data is lost when the process exits.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{CacheRecord, CacheStore, StoreError};

#[derive(Default)]
pub struct MemoryCacheStore {
    records: Mutex<HashMap<String, CacheRecord>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as-is, bypassing TTL arithmetic.
    pub fn insert(&self, record: CacheRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.key.clone(), record);
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        ttl_seconds: u64,
        value: Value,
        now: i64,
    ) -> Result<CacheRecord, StoreError> {
        let record = CacheRecord::new(key, value, ttl_seconds, now);
        self.insert(record.clone());
        Ok(record)
    }
}
