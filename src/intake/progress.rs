//! Progress callback trait for interface-agnostic updates
//!
//! Lets a front end (CLI, web handler) follow a submission through its
//! states without the coordinator knowing how they are displayed.

use crate::intake::append::AppendOutcome;
use async_trait::async_trait;
use std::fmt;

/// Submission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the submission lock
    RequestingLock,
    /// Lock acquired
    LockHeld,
    /// Writing rows to both tables
    Appending,
    /// Sending the confirmation copy
    Notifying,
    /// Lock released
    Released,
    /// Result ready
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RequestingLock => "Waiting for lock",
            Self::LockHeld => "Lock acquired",
            Self::Appending => "Writing rows",
            Self::Notifying => "Sending confirmation",
            Self::Released => "Lock released",
            Self::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called on each state transition
    async fn on_phase(&self, phase: Phase);

    /// Called once rows are in both tables
    async fn on_rows_written(&self, sheet: &str, outcome: &AppendOutcome);

    /// Called when the confirmation copy could not be sent
    async fn on_notification_failed(&self, reason: &str);
}

/// No-op progress callback for when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_rows_written(&self, _sheet: &str, _outcome: &AppendOutcome) {}
    async fn on_notification_failed(&self, _reason: &str) {}
}
