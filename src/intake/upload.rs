//! Upload validation and storage
//!
//! Never fails across its boundary: every outcome is an [`UploadResult`].

use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::types::{ALLOWED_EXTENSIONS, FileUpload, StoredFile, UploadResult};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::sync::Arc;
use tracing::{info, warn};

/// Generic message for storage-side failures
pub const UPLOAD_FAILED_MESSAGE: &str = "The file could not be uploaded. Please try again.";

/// Lowercased text after the last `.`, if any
pub fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Whether `file_name` has one of the allowed extensions
pub fn is_allowed(file_name: &str) -> bool {
    file_extension(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Base64 payload with any `data:<mime>;base64,` prefix removed
fn payload(data: &str) -> &str {
    if data.starts_with("data:") {
        data.split_once(',').map_or(data, |(_, rest)| rest)
    } else {
        data
    }
}

/// Validates uploads and hands them to the blob store
pub struct UploadGateway {
    blobs: Arc<dyn BlobStore>,
}

impl UploadGateway {
    /// Create a gateway over `blobs`
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Validate and store one file
    pub async fn upload(&self, upload: &FileUpload) -> UploadResult {
        if !is_allowed(&upload.file_name) {
            let shown = file_extension(&upload.file_name)
                .map_or_else(|| "(none)".to_string(), |ext| format!(".{ext}"));
            warn!("Rejected upload {}: extension {shown}", upload.file_name);
            return UploadResult::failed(format!(
                "Invalid file type {shown}. Allowed types: {}.",
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }

        match self.store(upload).await {
            Ok(file) => {
                info!("Uploaded {} as {}", upload.file_name, file.id);
                UploadResult::stored(file)
            }
            Err(e) => {
                warn!("Upload of {} failed: {e}", upload.file_name);
                UploadResult::failed(UPLOAD_FAILED_MESSAGE)
            }
        }
    }

    async fn store(&self, upload: &FileUpload) -> Result<StoredFile> {
        let bytes = BASE64
            .decode(payload(upload.data.trim()))
            .map_err(|e| Error::Storage(format!("invalid base64 payload: {e}")))?;
        self.blobs
            .create_file(&bytes, &upload.mime_type, &upload.file_name)
            .await
    }
}
