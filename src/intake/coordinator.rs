//! Submission coordination
//!
//! Runs one submission as a transaction under the process-wide lock:
//! resolve both tables, append the rows, then send the optional copy.
//! The lock guard lives in [`SubmissionCoordinator::submit_with_progress`]
//! and is dropped before the result is built, whatever path was taken.

use crate::error::{Error, Result};
use crate::intake::append::append_rows;
use crate::intake::notify::NotificationComposer;
use crate::intake::progress::{NoopProgress, Phase, ProgressCallback};
use crate::lock::LockProvider;
use crate::store::TableStore;
use crate::types::{Submission, SubmitResult, TIMESTAMP_FORMAT, build_rows};
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Shown when the lock could not be acquired in time
pub const LOCK_BUSY_MESSAGE: &str =
    "The system is busy with other submissions. Please try again later or contact the administrator.";

/// Shown on success
pub const SUCCESS_MESSAGE: &str = "Data submitted successfully.";

/// Shown on success when the confirmation copy failed
pub const COPY_FAILED_MESSAGE: &str =
    "Data submitted successfully, but the confirmation email could not be sent.";

/// Serializes submissions and writes them to the per-sheet and consolidated tables
pub struct SubmissionCoordinator {
    store: Arc<dyn TableStore>,
    lock: Arc<dyn LockProvider>,
    notifier: NotificationComposer,
    consolidated_sheet: String,
    lock_wait: Duration,
}

impl SubmissionCoordinator {
    /// Create a coordinator
    pub fn new(
        store: Arc<dyn TableStore>,
        lock: Arc<dyn LockProvider>,
        notifier: NotificationComposer,
        consolidated_sheet: String,
        lock_wait: Duration,
    ) -> Self {
        Self {
            store,
            lock,
            notifier,
            consolidated_sheet,
            lock_wait,
        }
    }

    /// Name of the table that receives every row
    pub fn consolidated_sheet(&self) -> &str {
        &self.consolidated_sheet
    }

    /// Submit without progress reporting
    pub async fn submit(&self, submission: &Submission) -> SubmitResult {
        self.submit_with_progress(submission, &NoopProgress).await
    }

    /// Submit, reporting each state transition to `progress`
    pub async fn submit_with_progress(
        &self,
        submission: &Submission,
        progress: &dyn ProgressCallback,
    ) -> SubmitResult {
        if submission.entries.is_empty() {
            progress.on_phase(Phase::Done).await;
            return SubmitResult::failed("At least one entry is required.");
        }

        progress.on_phase(Phase::RequestingLock).await;
        let guard = match self.lock.acquire(self.lock_wait).await {
            Ok(guard) => guard,
            Err(e) => {
                warn!(
                    "Submission to {} abandoned: {e}",
                    submission.selected_sheet
                );
                progress.on_phase(Phase::Done).await;
                return failure_result(e);
            }
        };
        progress.on_phase(Phase::LockHeld).await;

        let outcome = self.run_locked(submission, progress).await;

        drop(guard);
        progress.on_phase(Phase::Released).await;

        let result = outcome.unwrap_or_else(failure_result);
        progress.on_phase(Phase::Done).await;
        result
    }

    async fn run_locked(
        &self,
        submission: &Submission,
        progress: &dyn ProgressCallback,
    ) -> Result<SubmitResult> {
        let primary = self
            .store
            .table(&submission.selected_sheet)
            .await?
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Sheet \"{}\" not found.",
                    submission.selected_sheet
                ))
            })?;
        let consolidated = self
            .store
            .table(&self.consolidated_sheet)
            .await?
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Consolidated sheet \"{}\" not found.",
                    self.consolidated_sheet
                ))
            })?;

        // One timestamp for the whole batch
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let rows = build_rows(submission, &timestamp);

        progress.on_phase(Phase::Appending).await;
        let written = append_rows(primary.as_ref(), consolidated.as_ref(), &rows).await?;
        info!(
            "Stored {} row(s) for {} ({} row {}, {} row {})",
            written.rows_written,
            submission.email,
            primary.name(),
            written.primary_row,
            consolidated.name(),
            written.consolidated_row
        );
        progress
            .on_rows_written(&submission.selected_sheet, &written)
            .await;

        if !submission.send_copy {
            return Ok(SubmitResult::ok(SUCCESS_MESSAGE));
        }

        progress.on_phase(Phase::Notifying).await;
        match self.notifier.send(submission, &timestamp).await {
            Ok(()) => Ok(SubmitResult::ok(format!(
                "{SUCCESS_MESSAGE} A copy was sent to {}.",
                submission.email
            ))),
            Err(e) => {
                warn!("Confirmation for {} not sent: {e}", submission.email);
                progress.on_notification_failed(&e.to_string()).await;
                Ok(SubmitResult::ok(COPY_FAILED_MESSAGE))
            }
        }
    }
}

fn failure_result(err: Error) -> SubmitResult {
    match err {
        Error::Validation(msg) => SubmitResult::failed(msg),
        Error::LockTimeout(_) => SubmitResult::failed(LOCK_BUSY_MESSAGE),
        other => {
            error!("Submission failed: {other}");
            SubmitResult::failed(format!(
                "Critical error while saving data: {other}. Please contact the administrator."
            ))
        }
    }
}
