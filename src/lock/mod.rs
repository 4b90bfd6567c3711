//! Mutual exclusion for submissions
//!
//! A [`LockProvider`] hands out a [`LockGuard`] within a bounded wait. The
//! lock is held for exactly as long as the guard lives, so every exit path
//! of the holder (early return, error, panic) releases it.
//!
//! [`ProcessLock`] serializes submitters inside one process; [`FileLock`]
//! extends that to every process sharing a data directory.

mod file;

pub use file::FileLock;

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Proof of lock ownership; dropping it releases the lock
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    _held: Box<dyn Send + Sync>,
}

impl LockGuard {
    /// Wrap whatever releases the underlying lock when dropped
    pub fn new<T: Send + Sync + 'static>(held: T) -> Self {
        Self {
            _held: Box::new(held),
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

/// Source of the submission lock
#[async_trait]
pub trait LockProvider: Send + Sync {
    /// Acquire the lock, giving up with [`Error::LockTimeout`] after `wait`
    async fn acquire(&self, wait: Duration) -> Result<LockGuard>;
}

/// Process-wide lock shared by every clone
#[derive(Debug, Clone, Default)]
pub struct ProcessLock {
    inner: Arc<Mutex<()>>,
}

impl ProcessLock {
    /// Create a new, unlocked lock
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockProvider for ProcessLock {
    async fn acquire(&self, wait: Duration) -> Result<LockGuard> {
        let guard = tokio::time::timeout(wait, Arc::clone(&self.inner).lock_owned())
            .await
            .map_err(|_| Error::LockTimeout(wait))?;
        debug!("Submission lock acquired");
        Ok(LockGuard::new(guard))
    }
}
