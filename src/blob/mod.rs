//! Blob storage for uploaded files

mod local;

pub use local::LocalBlobStore;

use crate::error::Result;
use crate::types::StoredFile;
use async_trait::async_trait;

/// Folder-scoped file storage
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `name`, returning its id and URL
    async fn create_file(&self, bytes: &[u8], mime_type: &str, name: &str) -> Result<StoredFile>;

    /// Resolve a file id back to its canonical name and URL
    async fn get_by_id(&self, id: &str) -> Result<StoredFile>;
}
