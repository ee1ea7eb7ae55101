//! File-backed cache backend.
//!
//! One JSON file per key under a cache directory. File names are the SHA-256
//! of the key, so arbitrary key text is safe on every filesystem. Writes go to
//! a temporary file that is renamed into place, so readers in other processes
//! see either the old record or the new one, never a torn write.

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{CacheRecord, CacheStore, StoreError};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Cache shared between processes through a directory on disk.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        path.with_file_name(name)
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: CacheRecord = serde_json::from_slice(&bytes)?;
        if record.key != key {
            tracing::warn!(path = %path.display(), "cache file holds a different key; ignoring");
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn put(
        &self,
        key: &str,
        ttl_seconds: u64,
        value: Value,
        now: i64,
    ) -> Result<CacheRecord, StoreError> {
        let record = CacheRecord::new(key, value, ttl_seconds, now);
        let bytes = serde_json::to_vec(&record)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = self.tmp_path_for(&path);
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::trace!(path = %path.display(), expires_at = record.expires_at_unix, "cache record written");
        Ok(record)
    }
}
