//! Runtime configuration
//!
//! Values come from `INTAKE_*` environment variables, falling back to
//! defaults. Resolution takes a lookup function so it can run against a
//! fixed map in tests.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default name of the consolidated sheet
pub const DEFAULT_CONSOLIDATED_SHEET: &str = "Consolidated";

/// Default sender display name
pub const DEFAULT_SENDER_NAME: &str = "Data Intake";

/// Default bounded wait for the submission lock
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(30);

/// Session time-to-live
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Root of all local state
    pub data_dir: PathBuf,
    /// Name of the sheet that receives every row
    pub consolidated_sheet: String,
    /// Display name on confirmation mail
    pub sender_name: String,
    /// Mail relay endpoint; outbox delivery when unset
    pub mail_webhook: Option<String>,
    /// Bearer token for the mail relay
    pub mail_token: Option<String>,
    /// How long a submission waits for the lock
    pub lock_wait: Duration,
    /// Session time-to-live
    pub session_ttl: Duration,
    /// Current user, keys the session
    pub user: String,
}

impl IntakeConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve using `lookup` for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("INTAKE_DATA_DIR").map_or_else(default_data_dir, PathBuf::from);

        let lock_wait = match non_empty("INTAKE_LOCK_WAIT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| Error::Config(format!("INTAKE_LOCK_WAIT_MS={raw}: {e}")))?,
            None => DEFAULT_LOCK_WAIT,
        };

        Ok(Self {
            data_dir,
            consolidated_sheet: non_empty("INTAKE_CONSOLIDATED_SHEET")
                .unwrap_or_else(|| DEFAULT_CONSOLIDATED_SHEET.to_string()),
            sender_name: non_empty("INTAKE_SENDER_NAME")
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            mail_webhook: non_empty("INTAKE_MAIL_WEBHOOK"),
            mail_token: non_empty("INTAKE_MAIL_TOKEN"),
            lock_wait,
            session_ttl: SESSION_TTL,
            user: non_empty("INTAKE_USER")
                .or_else(|| non_empty("USER"))
                .unwrap_or_else(|| "anonymous".to_string()),
        })
    }

    /// Directory holding one file per sheet
    pub fn sheets_dir(&self) -> PathBuf {
        self.data_dir.join("sheets")
    }

    /// Blob folder for uploads
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Outbox for locally delivered mail
    pub fn outbox_dir(&self) -> PathBuf {
        self.data_dir.join("outbox")
    }

    /// Session cache file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("sessions.json")
    }

    /// File locked by every process submitting into this data directory
    pub fn lock_file(&self) -> PathBuf {
        self.data_dir.join("submit.lock")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".sheet-intake"),
        |dir| dir.join("sheet-intake"),
    )
}
