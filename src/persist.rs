//! Atomic file replacement

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Replace `path` with `bytes` so readers see either the old or the new file
///
/// The bytes go to a uniquely named temp file next to `path`, which is then
/// renamed over it. Concurrent writers never share a temp file.
pub(crate) async fn write_atomic(path: &Path, bytes: Vec<u8>) -> io::Result<()> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replaces_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("North.json");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new".to_vec()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("North.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                tokio::spawn(async move { write_atomic(&path, format!("v{i}").into_bytes()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('v'));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
