//! File-backed table store
//!
//! Every sheet is one JSON file (`<name>.json`) holding its grid of cells.

use crate::error::{Error, Result};
use crate::persist::write_atomic;
use crate::store::{
    Table, TableStore, grid_last_row, grid_read, grid_write, validate_sheet_name,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

const SHEET_EXTENSION: &str = "json";

/// A sheet stored as a JSON grid on disk
#[derive(Debug, Clone)]
pub struct LocalTable {
    name: String,
    path: PathBuf,
}

impl LocalTable {
    async fn load(&self) -> Result<Vec<Vec<String>>> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| Error::StoreWrite(format!("{}: {e}", self.path.display())))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::StoreWrite(format!("{}: {e}", self.path.display())))
    }

    async fn save(&self, grid: &[Vec<String>]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(grid)?;
        write_atomic(&self.path, bytes)
            .await
            .map_err(|e| Error::StoreWrite(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl Table for LocalTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn last_row(&self) -> Result<usize> {
        Ok(grid_last_row(&self.load().await?))
    }

    async fn read_range(
        &self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Result<Vec<Vec<String>>> {
        let grid = self.load().await?;
        grid_read(&grid, top, left, bottom, right)
    }

    async fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> Result<()> {
        let mut grid = self.load().await?;
        grid_write(&mut grid, row, col, values)?;
        self.save(&grid).await?;
        debug!(
            "Wrote {} row(s) to {} at row {row}",
            values.len(),
            self.name
        );
        Ok(())
    }
}

/// Table store rooted at a directory of sheet files
#[derive(Debug, Clone)]
pub struct LocalTableStore {
    dir: PathBuf,
}

impl LocalTableStore {
    /// Open a store at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{SHEET_EXTENSION}"))
    }

    fn handle(&self, name: &str) -> LocalTable {
        LocalTable {
            name: name.to_string(),
            path: self.sheet_path(name),
        }
    }
}

#[async_trait]
impl TableStore for LocalTableStore {
    async fn sheet_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SHEET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn table(&self, name: &str) -> Result<Option<Arc<dyn Table>>> {
        if validate_sheet_name(name).is_err() {
            return Ok(None);
        }
        let handle = self.handle(name);
        if fs::try_exists(&handle.path).await? {
            Ok(Some(Arc::new(handle)))
        } else {
            Ok(None)
        }
    }

    async fn create_sheet(&self, name: &str) -> Result<Arc<dyn Table>> {
        validate_sheet_name(name)?;
        let handle = self.handle(name);
        if !fs::try_exists(&handle.path).await? {
            handle.save(&[]).await?;
            debug!("Created sheet {name} at {}", handle.path.display());
        }
        Ok(Arc::new(handle))
    }
}
