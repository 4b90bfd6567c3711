//! Cross-process lock on a lock file
//!
//! Takes an OS advisory lock on a file shared by every process using the
//! same data directory. The lock belongs to the open file handle, so it is
//! also exclusive between two [`FileLock`]s in one process, and the OS drops
//! it if the holder dies.

use crate::error::{Error, Result};
use crate::lock::{LockGuard, LockProvider};
use async_trait::async_trait;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Delay between attempts while the lock is held elsewhere
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Lock provider backed by an advisory lock on `path`
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Lock on `path`, created on first use
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)?)
    }
}

#[async_trait]
impl LockProvider for FileLock {
    async fn acquire(&self, wait: Duration) -> Result<LockGuard> {
        let file = self.open()?;
        let deadline = Instant::now() + wait;

        loop {
            if file.try_lock_exclusive()? {
                debug!("Lock file {} acquired", self.path.display());
                // Closing the handle on drop releases the lock
                return Ok(LockGuard::new(file));
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::LockTimeout(wait));
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
