//! Upload command

use crate::cli::style::{check, hyperlink_url, Stream, Stylize};
use anstream::println;
use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sheet_intake::intake::file_extension;
use sheet_intake::service::IntakeService;
use sheet_intake::types::FileUpload;
use std::path::Path;

/// MIME type for an allowed extension
fn mime_for(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("csv") => "text/csv",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        _ => "application/octet-stream",
    }
}

/// Run the upload command
pub async fn run_upload(
    service: &IntakeService,
    path: &Path,
    mime: Option<&str>,
) -> anyhow::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;

    let upload = FileUpload {
        mime_type: mime.unwrap_or_else(|| mime_for(&file_name)).to_string(),
        data: BASE64.encode(&bytes),
        file_name,
    };

    let result = service.upload_file(&upload).await;
    match (result.success, result.url) {
        (true, Some(url)) => {
            println!(
                "{} Uploaded {}",
                check(),
                result.name.as_deref().unwrap_or(&upload.file_name).emphasis()
            );
            println!("  {}", hyperlink_url(Stream::Stdout, &url).accent());
            Ok(())
        }
        _ => bail!(
            "{}",
            result.error.unwrap_or_else(|| "upload failed".to_string())
        ),
    }
}
