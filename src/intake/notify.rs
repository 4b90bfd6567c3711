//! Confirmation message composition and delivery

use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::mail::Mailer;
use crate::types::{DATE_FORMAT, EmailMessage, Submission};
use quick_xml::escape::escape;
use regex::Regex;
use std::fmt::Write;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// First run of 25+ word characters or hyphens in a stored-file URL
static FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\w]{25,}").expect("hardcoded file id pattern is valid"));

/// Extract the stable file identifier from a stored-file URL
pub fn extract_file_id(url: &str) -> Option<&str> {
    FILE_ID.find(url).map(|m| m.as_str())
}

/// One line of the file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLink {
    /// Resolved through the blob store
    Resolved {
        /// Entry label plus file slot
        label: String,
        /// Canonical file name
        name: String,
        /// Canonical URL
        url: String,
    },
    /// Id missing from the URL or unknown to the blob store
    Unavailable {
        /// Entry label plus file slot
        label: String,
    },
}

/// Builds and sends the confirmation copy of a submission
pub struct NotificationComposer {
    mailer: Arc<dyn Mailer>,
    blobs: Arc<dyn BlobStore>,
    sender_name: String,
}

impl NotificationComposer {
    /// Create a composer
    pub fn new(mailer: Arc<dyn Mailer>, blobs: Arc<dyn BlobStore>, sender_name: String) -> Self {
        Self {
            mailer,
            blobs,
            sender_name,
        }
    }

    /// Resolve every attached file of every entry
    ///
    /// A file that cannot be resolved becomes [`FileLink::Unavailable`]; the
    /// others are unaffected.
    pub async fn file_links(&self, submission: &Submission) -> Vec<FileLink> {
        let mut links = Vec::new();
        for entry in &submission.entries {
            for (slot, url) in entry.files().into_iter().enumerate() {
                let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
                    continue;
                };
                let label = format!("{} (file {})", entry.checkbox_label, slot + 1);

                let Some(id) = extract_file_id(url) else {
                    warn!("No file id in {url}");
                    links.push(FileLink::Unavailable { label });
                    continue;
                };

                match self.blobs.get_by_id(id).await {
                    Ok(file) => links.push(FileLink::Resolved {
                        label,
                        name: file.name,
                        url: file.url,
                    }),
                    Err(e) => {
                        warn!("Could not resolve file {id}: {e}");
                        links.push(FileLink::Unavailable { label });
                    }
                }
            }
        }
        links
    }

    /// Build the message for `submission`
    pub async fn compose(&self, submission: &Submission, timestamp: &str) -> EmailMessage {
        let links = self.file_links(submission).await;
        EmailMessage {
            to: submission.email.clone(),
            subject: format!("Submission confirmation: {}", submission.selected_sheet),
            html_body: render_body(submission, timestamp, &links),
            sender_name: self.sender_name.clone(),
        }
    }

    /// Compose and deliver the confirmation copy
    pub async fn send(&self, submission: &Submission, timestamp: &str) -> Result<()> {
        let message = self.compose(submission, timestamp).await;
        self.mailer
            .send_email(&message)
            .await
            .map_err(|e| match e {
                Error::Notification(_) => e,
                other => Error::Notification(other.to_string()),
            })?;
        debug!("Confirmation sent to {}", submission.email);
        Ok(())
    }
}

fn render_body(submission: &Submission, timestamp: &str, links: &[FileLink]) -> String {
    let note = if submission.note.trim().is_empty() {
        "(none)"
    } else {
        submission.note.as_str()
    };

    let mut body = String::from("<h2>Submission confirmation</h2>\n<p>");
    let _ = writeln!(body, "<strong>Submitted:</strong> {}<br>", escape(timestamp));
    let _ = writeln!(body, "<strong>Email:</strong> {}<br>", escape(&submission.email));
    let _ = writeln!(
        body,
        "<strong>Sheet:</strong> {}<br>",
        escape(&submission.selected_sheet)
    );
    let _ = writeln!(body, "<strong>Note:</strong> {}<br>", escape(note));
    let _ = writeln!(
        body,
        "<strong>Period:</strong> {} to {}</p>",
        submission.start_date.format(DATE_FORMAT),
        submission.end_date.format(DATE_FORMAT)
    );

    body.push_str("<h3>Items</h3>\n<ul>\n");
    for entry in &submission.entries {
        match entry.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(date) => {
                let _ = writeln!(
                    body,
                    "<li>{} (billing date: {})</li>",
                    escape(&entry.checkbox_label),
                    escape(date)
                );
            }
            None => {
                let _ = writeln!(body, "<li>{}</li>", escape(&entry.checkbox_label));
            }
        }
    }
    body.push_str("</ul>\n<h3>Files</h3>\n");

    if links.is_empty() {
        body.push_str("<p>No files attached.</p>\n");
        return body;
    }

    body.push_str("<ul>\n");
    for link in links {
        match link {
            FileLink::Resolved { label, name, url } => {
                let _ = writeln!(
                    body,
                    "<li>{}: <a href=\"{}\">{}</a></li>",
                    escape(label),
                    escape(url),
                    escape(name)
                );
            }
            FileLink::Unavailable { label } => {
                let _ = writeln!(body, "<li>{}: file link unavailable</li>", escape(label));
            }
        }
    }
    body.push_str("</ul>\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, StoredFile};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    const KNOWN_ID: &str = "1aB2cD3eF4gH5iJ6kL7mN8oP9qR0sT";

    struct FixedBlobs;

    #[async_trait]
    impl BlobStore for FixedBlobs {
        async fn create_file(&self, _: &[u8], _: &str, _: &str) -> Result<StoredFile> {
            Err(Error::Storage("read-only".to_string()))
        }

        async fn get_by_id(&self, id: &str) -> Result<StoredFile> {
            if id == KNOWN_ID {
                Ok(StoredFile {
                    id: id.to_string(),
                    name: "receipt.pdf".to_string(),
                    url: format!("https://files.example.com/{id}/view"),
                })
            } else {
                Err(Error::Storage("not found".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_email(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn make_submission() -> Submission {
        Submission {
            email: "ana@example.com".to_string(),
            selected_sheet: "R&D".to_string(),
            note: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            send_copy: true,
            entries: vec![
                Entry {
                    checkbox_label: "Travel".to_string(),
                    file1: Some(format!("https://files.example.com/{KNOWN_ID}/view")),
                    file2: Some("https://files.example.com/short/view".to_string()),
                    date: Some("2026-09-14".to_string()),
                    ..Entry::default()
                },
                Entry {
                    checkbox_label: "Meals".to_string(),
                    file3: Some(
                        "https://files.example.com/zzzzzzzzzzzzzzzzzzzzzzzzzzzz/view".to_string(),
                    ),
                    ..Entry::default()
                },
            ],
        }
    }

    fn composer(mailer: Arc<RecordingMailer>) -> NotificationComposer {
        NotificationComposer::new(mailer, Arc::new(FixedBlobs), "Data Intake".to_string())
    }

    #[test]
    fn test_extract_file_id() {
        assert_eq!(
            extract_file_id(&format!("https://files.example.com/d/{KNOWN_ID}/view")),
            Some(KNOWN_ID)
        );
        assert_eq!(extract_file_id("https://files.example.com/d/short"), None);
    }

    #[tokio::test]
    async fn test_unresolvable_files_get_placeholders() {
        let links = composer(Arc::default()).file_links(&make_submission()).await;

        assert_eq!(links.len(), 3);
        assert_eq!(
            links[0],
            FileLink::Resolved {
                label: "Travel (file 1)".to_string(),
                name: "receipt.pdf".to_string(),
                url: format!("https://files.example.com/{KNOWN_ID}/view"),
            }
        );
        assert_eq!(
            links[1],
            FileLink::Unavailable {
                label: "Travel (file 2)".to_string()
            }
        );
        assert_eq!(
            links[2],
            FileLink::Unavailable {
                label: "Meals (file 3)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_send_delivers_to_submitter() {
        let mailer = Arc::new(RecordingMailer::default());
        composer(Arc::clone(&mailer))
            .send(&make_submission(), "2026-10-01 09:30:00")
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        assert_eq!(message.to, "ana@example.com");
        assert_eq!(message.subject, "Submission confirmation: R&D");
        assert_eq!(message.sender_name, "Data Intake");
        assert!(message.html_body.contains("<strong>Sheet:</strong> R&amp;D"));
        assert!(message.html_body.contains("<strong>Note:</strong> (none)"));
        assert!(message.html_body.contains("2026-09-01 to 2026-09-30"));
        assert!(message.html_body.contains("<li>Travel (billing date: 2026-09-14)</li>"));
        assert!(message.html_body.contains("<li>Meals</li>"));
        assert!(message.html_body.contains(">receipt.pdf</a>"));
        assert!(message
            .html_body
            .contains("<li>Meals (file 3): file link unavailable</li>"));
    }

    #[tokio::test]
    async fn test_no_files_message() {
        let mut submission = make_submission();
        for entry in &mut submission.entries {
            *entry = Entry {
                checkbox_label: entry.checkbox_label.clone(),
                ..Entry::default()
            };
        }
        let message = composer(Arc::default())
            .compose(&submission, "2026-10-01 09:30:00")
            .await;

        assert!(message.html_body.contains("<p>No files attached.</p>"));
    }
}
