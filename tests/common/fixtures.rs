//! Test data factories for sheet-intake types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use chrono::NaiveDate;
use sheet_intake::types::{Entry, FileUpload, Submission};

/// Create an entry with only a label
pub fn make_entry(label: &str) -> Entry {
    Entry {
        checkbox_label: label.to_string(),
        ..Entry::default()
    }
}

/// Create an entry with a first file and a billing date
pub fn make_entry_with_file(label: &str, url: &str, date: &str) -> Entry {
    Entry {
        checkbox_label: label.to_string(),
        file1: Some(url.to_string()),
        date: Some(date.to_string()),
        ..Entry::default()
    }
}

/// Create a submission for `sheet` with the given entries
pub fn make_submission(sheet: &str, entries: Vec<Entry>) -> Submission {
    Submission {
        email: "ana@example.com".to_string(),
        selected_sheet: sheet.to_string(),
        note: "September expenses".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
        end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap_or_default(),
        send_copy: false,
        entries,
    }
}

/// Same as [`make_submission`] but asking for a confirmation copy
pub fn make_submission_with_copy(sheet: &str, entries: Vec<Entry>) -> Submission {
    Submission {
        send_copy: true,
        ..make_submission(sheet, entries)
    }
}

/// Create an upload with base64 payload "hello"
pub fn make_upload(file_name: &str) -> FileUpload {
    FileUpload {
        file_name: file_name.to_string(),
        mime_type: "application/pdf".to_string(),
        data: "aGVsbG8=".to_string(),
    }
}

/// A row of `width` cells all set to `value`
pub fn filled_row(value: &str, width: usize) -> Vec<String> {
    vec![value.to_string(); width]
}
