//! Client-facing intake API
//!
//! The five calls a form front end makes. Every call returns a plain value
//! or result object; faults are logged and folded into that value.

use crate::blob::{BlobStore, LocalBlobStore};
use crate::cache::{FileCache, SessionCache};
use crate::config::IntakeConfig;
use crate::error::Result;
use crate::intake::{
    NotificationComposer, NoopProgress, ProgressCallback, SessionGuard, SubmissionCoordinator,
    UploadGateway,
};
use crate::lock::{FileLock, LockProvider};
use crate::mail::{Mailer, OutboxMailer, WebhookMailer};
use crate::store::{LocalTableStore, TableStore};
use crate::types::{
    FileUpload, SessionStatus, StartSessionResult, Submission, SubmitResult, UploadResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Collaborators an [`IntakeService`] is assembled from
pub struct Collaborators {
    /// Tabular store holding every sheet
    pub store: Arc<dyn TableStore>,
    /// Upload storage
    pub blobs: Arc<dyn BlobStore>,
    /// Confirmation mail transport
    pub mailer: Arc<dyn Mailer>,
    /// Session cache
    pub cache: Arc<dyn SessionCache>,
    /// Submission lock
    pub lock: Arc<dyn LockProvider>,
}

/// The intake API
pub struct IntakeService {
    store: Arc<dyn TableStore>,
    coordinator: SubmissionCoordinator,
    uploads: UploadGateway,
    sessions: SessionGuard,
}

impl IntakeService {
    /// Assemble a service from collaborators and configuration
    pub fn new(parts: Collaborators, config: &IntakeConfig) -> Self {
        Self::with_settings(
            parts,
            config.consolidated_sheet.clone(),
            config.sender_name.clone(),
            config.lock_wait,
            config.session_ttl,
        )
    }

    /// Assemble a service with explicit settings
    pub fn with_settings(
        parts: Collaborators,
        consolidated_sheet: String,
        sender_name: String,
        lock_wait: Duration,
        session_ttl: Duration,
    ) -> Self {
        let notifier =
            NotificationComposer::new(parts.mailer, Arc::clone(&parts.blobs), sender_name);
        Self {
            store: Arc::clone(&parts.store),
            coordinator: SubmissionCoordinator::new(
                parts.store,
                parts.lock,
                notifier,
                consolidated_sheet,
                lock_wait,
            ),
            uploads: UploadGateway::new(parts.blobs),
            sessions: SessionGuard::new(parts.cache, session_ttl),
        }
    }

    /// Sheets a user may submit to (every sheet except the consolidated one)
    pub async fn get_sheet_names(&self) -> Vec<String> {
        match self.store.sheet_names().await {
            Ok(names) => names
                .into_iter()
                .filter(|n| n != self.coordinator.consolidated_sheet())
                .collect(),
            Err(e) => {
                error!("Could not list sheets: {e}");
                Vec::new()
            }
        }
    }

    /// Validate and store an uploaded file
    pub async fn upload_file(&self, upload: &FileUpload) -> UploadResult {
        self.uploads.upload(upload).await
    }

    /// Submit form data
    pub async fn submit_data(&self, submission: &Submission) -> SubmitResult {
        self.submit_data_with_progress(submission, &NoopProgress)
            .await
    }

    /// Submit form data, reporting progress
    pub async fn submit_data_with_progress(
        &self,
        submission: &Submission,
        progress: &dyn ProgressCallback,
    ) -> SubmitResult {
        self.coordinator
            .submit_with_progress(submission, progress)
            .await
    }

    /// Start `user`'s session
    pub async fn start_session(&self, user: &str) -> StartSessionResult {
        match self.sessions.start(user).await {
            Ok(()) => StartSessionResult { success: true },
            Err(e) => {
                error!("Could not start session for {user}: {e}");
                StartSessionResult { success: false }
            }
        }
    }

    /// Check `user`'s session; an unreadable cache counts as expired
    pub async fn check_session(&self, user: &str) -> SessionStatus {
        self.sessions.check(user).await.unwrap_or_else(|e| {
            error!("Could not check session for {user}: {e}");
            SessionStatus { expired: true }
        })
    }
}

/// Build a service over local files under `config.data_dir`
///
/// Mail goes to the configured webhook if there is one, otherwise to the
/// outbox directory. Submissions lock `config.lock_file()`, so services in
/// separate processes over one data directory take turns.
pub fn create_local_service(config: &IntakeConfig) -> Result<IntakeService> {
    let mailer: Arc<dyn Mailer> = match &config.mail_webhook {
        Some(endpoint) => Arc::new(WebhookMailer::new(
            endpoint.clone(),
            config.mail_token.clone(),
        )),
        None => Arc::new(OutboxMailer::new(config.outbox_dir())),
    };

    let parts = Collaborators {
        store: Arc::new(LocalTableStore::open(config.sheets_dir())?),
        blobs: Arc::new(LocalBlobStore::open(config.uploads_dir())?),
        mailer,
        cache: Arc::new(FileCache::new(config.session_file())),
        lock: Arc::new(FileLock::new(config.lock_file())),
    };

    Ok(IntakeService::new(parts, config))
}

/// Create the named sheets plus the consolidated sheet
///
/// With `headers`, an empty sheet gets the column titles as row 1.
pub async fn init_sheets(
    store: &dyn TableStore,
    consolidated_sheet: &str,
    sheets: &[String],
    headers: bool,
) -> Result<Vec<String>> {
    let mut created = Vec::new();
    let names = sheets
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(consolidated_sheet));

    for name in names {
        if created.iter().any(|c: &String| c == name) {
            continue;
        }
        let table = store.create_sheet(name).await?;
        if headers && table.last_row().await? == 0 {
            let header = crate::types::Row::headers().into_cells();
            table.write_range(1, 1, &[header]).await?;
        }
        created.push(name.to_string());
    }
    Ok(created)
}
