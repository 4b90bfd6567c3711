//! Outbox mailer - writes messages to a directory

use crate::error::{Error, Result};
use crate::mail::Mailer;
use crate::types::EmailMessage;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// Mailer that stores each message as a JSON file
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
}

impl OutboxMailer {
    /// Create a mailer delivering into `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        if message.to.trim().is_empty() {
            return Err(Error::Notification("no recipient address".to_string()));
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::Notification(format!("outbox unavailable: {e}")))?;

        let file_name = format!(
            "{}-{}.json",
            Utc::now().format("%Y%m%dT%H%M%S"),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.dir.join(file_name);
        fs::write(&path, serde_json::to_vec_pretty(message)?)
            .await
            .map_err(|e| Error::Notification(format!("outbox write failed: {e}")))?;

        info!("Queued mail to {} in {}", message.to, path.display());
        Ok(())
    }
}
