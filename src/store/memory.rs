//! In-memory table store

use crate::error::{Error, Result};
use crate::store::{Table, TableStore, grid_last_row, grid_read, grid_write};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock};

/// A table held in memory
///
/// Each read or write takes the grid lock once, so a concurrent reader sees
/// either the whole of a range write or none of it.
#[derive(Debug)]
pub struct MemoryTable {
    name: String,
    grid: RwLock<Vec<Vec<String>>>,
}

impl MemoryTable {
    /// Create a table with initial contents
    pub fn with_rows(name: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            grid: RwLock::new(rows),
        }
    }

    /// Snapshot of the current grid
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.grid.read().map(|g| g.clone()).unwrap_or_default()
    }

    fn poisoned(&self) -> Error {
        Error::StoreWrite(format!("{}: table lock poisoned", self.name))
    }
}

#[async_trait]
impl Table for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn last_row(&self) -> Result<usize> {
        let grid = self.grid.read().map_err(|_| self.poisoned())?;
        Ok(grid_last_row(&grid))
    }

    async fn read_range(
        &self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Result<Vec<Vec<String>>> {
        let grid = self.grid.read().map_err(|_| self.poisoned())?;
        grid_read(&grid, top, left, bottom, right)
    }

    async fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> Result<()> {
        let mut grid = self.grid.write().map_err(|_| self.poisoned())?;
        grid_write(&mut grid, row, col, values)
    }
}

/// Table store kept entirely in memory, in creation order
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Mutex<Vec<Arc<MemoryTable>>>,
}

impl MemoryTableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with initial contents, replacing any table of that name
    pub fn insert(&self, table: MemoryTable) -> Arc<MemoryTable> {
        let table = Arc::new(table);
        if let Ok(mut tables) = self.tables.lock() {
            tables.retain(|t| t.name != table.name);
            tables.push(Arc::clone(&table));
        }
        table
    }

    /// Concrete handle to a table, for inspection
    pub fn sheet(&self, name: &str) -> Option<Arc<MemoryTable>> {
        self.tables
            .lock()
            .ok()?
            .iter()
            .find(|t| t.name == name)
            .cloned()
    }

    fn poisoned() -> Error {
        Error::StoreWrite("table store lock poisoned".to_string())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn sheet_names(&self) -> Result<Vec<String>> {
        let tables = self.tables.lock().map_err(|_| Self::poisoned())?;
        Ok(tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn table(&self, name: &str) -> Result<Option<Arc<dyn Table>>> {
        let tables = self.tables.lock().map_err(|_| Self::poisoned())?;
        Ok(tables
            .iter()
            .find(|t| t.name == name)
            .map(|t| Arc::clone(t) as Arc<dyn Table>))
    }

    async fn create_sheet(&self, name: &str) -> Result<Arc<dyn Table>> {
        let mut tables = self.tables.lock().map_err(|_| Self::poisoned())?;
        if let Some(existing) = tables.iter().find(|t| t.name == name) {
            return Ok(Arc::clone(existing) as Arc<dyn Table>);
        }
        let table = Arc::new(MemoryTable::with_rows(name, Vec::new()));
        tables.push(Arc::clone(&table));
        Ok(table)
    }
}
