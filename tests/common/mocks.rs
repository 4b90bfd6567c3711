//! Mock collaborators for testing
//!
//! Hand-written implementations of the collaborator traits with call
//! tracking and error injection.

#![allow(dead_code)]

use async_trait::async_trait;
use sheet_intake::blob::BlobStore;
use sheet_intake::cache::MemoryCache;
use sheet_intake::error::{Error, Result};
use sheet_intake::intake::{AppendOutcome, Phase, ProgressCallback};
use sheet_intake::lock::{LockGuard, LockProvider, ProcessLock};
use sheet_intake::mail::Mailer;
use sheet_intake::service::{Collaborators, IntakeService};
use sheet_intake::store::{MemoryTable, MemoryTableStore, Table, TableStore};
use sheet_intake::types::{EmailMessage, StoredFile};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Name used for the consolidated sheet in tests
pub const CONSOLIDATED: &str = "Consolidated";

// =============================================================================
// Mailer
// =============================================================================

/// Mailer that records messages instead of sending them
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<EmailMessage>>,
    error_on_send: Mutex<Option<String>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `send_email` fail with `msg`
    pub fn fail_send(&self, msg: &str) {
        *self.error_on_send.lock().unwrap() = Some(msg.to_string());
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<()> {
        if let Some(msg) = self.error_on_send.lock().unwrap().clone() {
            return Err(Error::Notification(msg));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// =============================================================================
// Blob store
// =============================================================================

/// Blob store keeping files in a map, with 28-character ids
#[derive(Default)]
pub struct MockBlobStore {
    files: Mutex<HashMap<String, StoredFile>>,
    next_id: AtomicUsize,
    create_calls: Mutex<Vec<String>>,
    error_on_create: Mutex<Option<String>>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file directly and return its URL
    pub fn add_file(&self, id: &str, name: &str) -> String {
        let url = format!("https://files.example.com/d/{id}/view");
        self.files.lock().unwrap().insert(
            id.to_string(),
            StoredFile {
                id: id.to_string(),
                name: name.to_string(),
                url: url.clone(),
            },
        );
        url
    }

    /// Make `create_file` fail with `msg`
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    /// Names passed to `create_file`
    pub fn create_calls(&self) -> Vec<String> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn create_file(&self, _bytes: &[u8], _mime_type: &str, name: &str) -> Result<StoredFile> {
        self.create_calls.lock().unwrap().push(name.to_string());
        if let Some(msg) = self.error_on_create.lock().unwrap().clone() {
            return Err(Error::Storage(msg));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = format!("file{n:024}");
        let url = self.add_file(&id, name);
        Ok(StoredFile {
            id,
            name: name.to_string(),
            url,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredFile> {
        self.files
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no file with id {id}")))
    }
}

// =============================================================================
// Table store with write failures
// =============================================================================

/// Table whose writes can be made to fail
pub struct FlakyTable {
    inner: Arc<MemoryTable>,
    fail_writes: bool,
}

#[async_trait]
impl Table for FlakyTable {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn last_row(&self) -> Result<usize> {
        self.inner.last_row().await
    }

    async fn read_range(
        &self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Result<Vec<Vec<String>>> {
        self.inner.read_range(top, left, bottom, right).await
    }

    async fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::StoreWrite(format!("{}: quota exceeded", self.inner.name())));
        }
        self.inner.write_range(row, col, values).await
    }
}

/// Memory store that can fail writes to chosen sheets
#[derive(Default)]
pub struct FlakyTableStore {
    inner: MemoryTableStore,
    failing: Mutex<HashSet<String>>,
}

impl FlakyTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying memory store
    pub fn memory(&self) -> &MemoryTableStore {
        &self.inner
    }

    /// Make every write to `sheet` fail
    pub fn fail_writes_to(&self, sheet: &str) {
        self.failing.lock().unwrap().insert(sheet.to_string());
    }
}

#[async_trait]
impl TableStore for FlakyTableStore {
    async fn sheet_names(&self) -> Result<Vec<String>> {
        self.inner.sheet_names().await
    }

    async fn table(&self, name: &str) -> Result<Option<Arc<dyn Table>>> {
        let Some(inner) = self.inner.sheet(name) else {
            return Ok(None);
        };
        let fail_writes = self.failing.lock().unwrap().contains(name);
        Ok(Some(Arc::new(FlakyTable { inner, fail_writes })))
    }

    async fn create_sheet(&self, name: &str) -> Result<Arc<dyn Table>> {
        self.inner.create_sheet(name).await
    }
}

// =============================================================================
// Lock
// =============================================================================

/// Lock provider counting acquisitions around a real [`ProcessLock`]
#[derive(Default)]
pub struct CountingLock {
    inner: ProcessLock,
    acquired: AtomicUsize,
    timed_out: AtomicUsize,
}

impl CountingLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn timed_out(&self) -> usize {
        self.timed_out.load(Ordering::SeqCst)
    }

    /// The wrapped lock, to hold it from a test
    pub fn process_lock(&self) -> &ProcessLock {
        &self.inner
    }
}

#[async_trait]
impl LockProvider for CountingLock {
    async fn acquire(&self, wait: Duration) -> Result<LockGuard> {
        match self.inner.acquire(wait).await {
            Ok(guard) => {
                self.acquired.fetch_add(1, Ordering::SeqCst);
                Ok(guard)
            }
            Err(e) => {
                self.timed_out.fetch_add(1, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}

// =============================================================================
// Progress
// =============================================================================

/// Progress callback recording every event
#[derive(Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<Phase>>,
    rows: Mutex<Vec<(String, AppendOutcome)>>,
    notification_failures: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn rows(&self) -> Vec<(String, AppendOutcome)> {
        self.rows.lock().unwrap().clone()
    }

    pub fn notification_failures(&self) -> Vec<String> {
        self.notification_failures.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    async fn on_rows_written(&self, sheet: &str, outcome: &AppendOutcome) {
        self.rows
            .lock()
            .unwrap()
            .push((sheet.to_string(), outcome.clone()));
    }

    async fn on_notification_failed(&self, reason: &str) {
        self.notification_failures
            .lock()
            .unwrap()
            .push(reason.to_string());
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A service wired to mocks, with handles for inspection
pub struct Harness {
    pub service: IntakeService,
    pub store: Arc<FlakyTableStore>,
    pub blobs: Arc<MockBlobStore>,
    pub mailer: Arc<MockMailer>,
    pub lock: Arc<CountingLock>,
}

impl Harness {
    /// Service over `sheets` plus the consolidated sheet, all empty
    pub fn with_sheets(sheets: &[&str], lock_wait: Duration) -> Self {
        let store = Arc::new(FlakyTableStore::new());
        for name in sheets.iter().copied().chain([CONSOLIDATED]) {
            store.memory().insert(MemoryTable::with_rows(name, Vec::new()));
        }
        Self::with_store(store, lock_wait)
    }

    /// Service over an existing store
    pub fn with_store(store: Arc<FlakyTableStore>, lock_wait: Duration) -> Self {
        let blobs = Arc::new(MockBlobStore::new());
        let mailer = Arc::new(MockMailer::new());
        let lock = Arc::new(CountingLock::new());
        let parts = Collaborators {
            store: Arc::clone(&store) as Arc<dyn TableStore>,
            blobs: Arc::clone(&blobs) as Arc<dyn BlobStore>,
            mailer: Arc::clone(&mailer) as Arc<dyn Mailer>,
            cache: Arc::new(MemoryCache::new()),
            lock: Arc::clone(&lock) as Arc<dyn LockProvider>,
        };
        let service = IntakeService::with_settings(
            parts,
            CONSOLIDATED.to_string(),
            "Data Intake".to_string(),
            lock_wait,
            Duration::from_secs(30 * 60),
        );
        Self {
            service,
            store,
            blobs,
            mailer,
            lock,
        }
    }

    /// Current contents of `sheet`
    pub fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.store
            .memory()
            .sheet(sheet)
            .map(|t| t.rows())
            .unwrap_or_default()
    }
}
