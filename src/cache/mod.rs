//! Volatile key/value cache with per-entry time-to-live

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Short-lived string cache
///
/// Entries past their time-to-live read as absent.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Store `value` under `key` for `ttl`
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Read a live entry
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Drop an entry (no-op when absent)
    async fn remove(&self, key: &str) -> Result<()>;
}
