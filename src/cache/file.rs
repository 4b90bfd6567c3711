//! JSON-file session cache
//!
//! Lets a session started by one CLI invocation be checked by the next.
//! Every read-modify-write cycle holds an advisory lock on `<file>.lock`, so
//! concurrent invocations do not drop each other's entries.

use crate::cache::SessionCache;
use crate::error::{Error, Result};
use crate::lock::{FileLock, LockGuard, LockProvider};
use crate::persist::write_atomic;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// How long a cache operation waits for another process to finish
const LOCK_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Cache persisted to a single JSON file
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    lock: FileLock,
}

impl FileCache {
    /// Create a cache backed by `path` (created on first write)
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        Self {
            lock: FileLock::new(PathBuf::from(lock_path)),
            path,
        }
    }

    async fn hold(&self) -> Result<LockGuard> {
        self.lock.acquire(LOCK_WAIT).await.map_err(|e| match e {
            Error::LockTimeout(_) => Error::Cache(format!(
                "{} is locked by another process",
                self.path.display()
            )),
            other => Error::Cache(format!("{}: {other}", self.lock.path().display())),
        })
    }

    async fn load(&self) -> Result<HashMap<String, StoredEntry>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::Cache(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(Error::Cache(format!("{}: {e}", self.path.display()))),
        }
    }

    async fn save(&self, entries: &HashMap<String, StoredEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        write_atomic(&self.path, serde_json::to_vec_pretty(entries)?)
            .await
            .map_err(|e| Error::Cache(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl SessionCache for FileCache {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let _guard = self.hold().await?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| Error::Cache(format!("ttl out of range: {e}")))?;

        let now = Utc::now();
        let mut entries = self.load().await?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        self.save(&entries).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.hold().await?;
        let entries = self.load().await?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.hold().await?;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
