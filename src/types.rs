//! Core types for sheet-intake

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of cells in every written row
pub const ROW_WIDTH: usize = 11;

/// Column titles, in row order
pub const COLUMN_HEADERS: [&str; ROW_WIDTH] = [
    "Timestamp",
    "Email",
    "Sheet",
    "Note",
    "Start Date",
    "End Date",
    "Item",
    "File 1",
    "File 2",
    "File 3",
    "Date",
];

/// Format of the timestamp cell
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the start/end date cells
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extensions accepted by the upload gateway (compared lowercase)
pub const ALLOWED_EXTENSIONS: [&str; 8] = ["pdf", "doc", "docx", "xls", "xlsx", "csv", "ppt", "pptx"];

/// A complete form submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submitter address, also the confirmation recipient
    pub email: String,
    /// Target sheet name
    #[serde(default)]
    pub selected_sheet: String,
    /// Free-text note
    #[serde(default)]
    pub note: String,
    /// Start of the reported period
    pub start_date: NaiveDate,
    /// End of the reported period
    pub end_date: NaiveDate,
    /// Whether to mail a confirmation copy
    #[serde(default)]
    pub send_copy: bool,
    /// Line items, one row each
    pub entries: Vec<Entry>,
}

/// One line item of a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Label of the ticked checkbox
    pub checkbox_label: String,
    /// First uploaded file URL
    #[serde(default)]
    pub file1: Option<String>,
    /// Second uploaded file URL
    #[serde(default)]
    pub file2: Option<String>,
    /// Third uploaded file URL
    #[serde(default)]
    pub file3: Option<String>,
    /// Optional billing date
    #[serde(default)]
    pub date: Option<String>,
}

impl Entry {
    /// File URLs in slot order
    pub fn files(&self) -> [Option<&str>; 3] {
        [
            self.file1.as_deref(),
            self.file2.as_deref(),
            self.file3.as_deref(),
        ]
    }
}

/// A fixed-width row as persisted to both tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: [String; ROW_WIDTH],
}

impl Row {
    /// Build the row for one entry, sharing the submission-wide fields
    pub fn from_entry(timestamp: &str, submission: &Submission, entry: &Entry) -> Self {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            cells: [
                timestamp.to_string(),
                submission.email.clone(),
                submission.selected_sheet.clone(),
                submission.note.clone(),
                submission.start_date.format(DATE_FORMAT).to_string(),
                submission.end_date.format(DATE_FORMAT).to_string(),
                entry.checkbox_label.clone(),
                opt(&entry.file1),
                opt(&entry.file2),
                opt(&entry.file3),
                opt(&entry.date),
            ],
        }
    }

    /// The header row
    pub fn headers() -> Self {
        Self {
            cells: COLUMN_HEADERS.map(ToString::to_string),
        }
    }

    /// Cells in column order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Consume into a plain cell vector
    pub fn into_cells(self) -> Vec<String> {
        self.cells.into()
    }
}

/// Build one row per entry, all carrying the same timestamp
pub fn build_rows(submission: &Submission, timestamp: &str) -> Vec<Row> {
    submission
        .entries
        .iter()
        .map(|entry| Row::from_entry(timestamp, submission, entry))
        .collect()
}

/// A file upload request from the form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    /// Original file name
    pub file_name: String,
    /// MIME type reported by the client
    pub mime_type: String,
    /// Base64 payload, optionally as a `data:` URL
    pub data: String,
}

/// Result of an upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Whether the file was stored
    pub success: bool,
    /// URL of the stored file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Stored file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Reason for failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// Successful upload
    pub fn stored(file: StoredFile) -> Self {
        Self {
            success: true,
            url: Some(file.url),
            name: Some(file.name),
            error: None,
        }
    }

    /// Failed upload
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            name: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    /// Whether the rows were written
    pub success: bool,
    /// User-facing message on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// User-facing error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResult {
    /// Successful submission
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failed submission
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Result of starting a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartSessionResult {
    /// Whether the session start was recorded
    pub success: bool,
}

/// Result of checking a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    /// Whether the session is missing or past its time-to-live
    pub expired: bool,
}

/// A file held by the blob store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    /// Stable file identifier (embedded in the URL)
    pub id: String,
    /// Canonical display name
    pub name: String,
    /// Dereferenceable URL
    pub url: String,
}

/// An outgoing mail message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html_body: String,
    /// Display name of the sender
    pub sender_name: String,
}
