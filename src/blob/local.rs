//! Directory-backed blob store
//!
//! Files live at `<folder>/<id>/<name>`. The id is a 32-character hex UUID,
//! which is what makes it recoverable from the `file://` URL later: the
//! folder part of every URL is escaped so the id is the first run of 25 or
//! more word characters in it.

use crate::blob::BlobStore;
use crate::error::{Error, Result};
use crate::types::StoredFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Longest run of id characters allowed in the folder part of a URL
const MAX_FOLDER_RUN: usize = 24;

/// Blob store writing into a local folder
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    folder: PathBuf,
    base: Url,
}

impl LocalBlobStore {
    /// Open a store at `folder`, creating it if needed
    pub fn open(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref();
        std::fs::create_dir_all(folder)?;
        // URLs need an absolute path
        let folder = folder.canonicalize()?;
        let base = Url::from_directory_path(&folder)
            .map_err(|()| Error::Storage(format!("no URL for {}", folder.display())))?;
        let base = Url::parse(&break_id_runs(base.as_str()))
            .map_err(|e| Error::Storage(format!("no URL for {}: {e}", folder.display())))?;
        Ok(Self { folder, base })
    }

    fn file_url(&self, id: &str, name: &str) -> Result<String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Storage(format!("no URL for {}", self.folder.display())))?
            .pop_if_empty()
            .push(id)
            .push(name);
        Ok(url.into())
    }
}

const fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Percent-encode one character of every run of id characters longer than
/// [`MAX_FOLDER_RUN`]
///
/// The encoded URL still names the same path, but a long directory name such
/// as `finance-department-intake-data` can no longer pass for a file id.
fn break_id_runs(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut run = 0;
    for c in url.chars() {
        if !is_id_char(c) {
            run = 0;
            out.push(c);
        } else if run == MAX_FOLDER_RUN {
            // The two hex digits start the next run
            out.push_str(&format!("%{:02X}", u32::from(c)));
            run = 2;
        } else {
            run += 1;
            out.push(c);
        }
    }
    out
}

/// Final path component of a client-supplied name
fn safe_file_name(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn create_file(&self, bytes: &[u8], mime_type: &str, name: &str) -> Result<StoredFile> {
        let file_name = safe_file_name(name)
            .ok_or_else(|| Error::Storage(format!("unusable file name: {name:?}")))?;

        let id = Uuid::new_v4().simple().to_string();
        let dir = self.folder.join(&id);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(file_name);
        fs::write(&path, bytes).await?;
        debug!(
            "Stored {} ({mime_type}, {} bytes) as {id}",
            file_name,
            bytes.len()
        );

        let url = self.file_url(&id, file_name)?;
        Ok(StoredFile {
            id,
            name: file_name.to_string(),
            url,
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<StoredFile> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::Storage(format!("invalid file id: {id:?}")));
        }

        let dir = self.folder.join(id);
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| Error::Storage(format!("file {id} not found: {e}")))?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let name = entry.file_name().to_string_lossy().into_owned();
                return Ok(StoredFile {
                    id: id.to_string(),
                    url: self.file_url(id, &name)?,
                    name,
                });
            }
        }

        Err(Error::Storage(format!("file {id} not found")))
    }
}
