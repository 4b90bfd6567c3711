//! Tabular store abstraction
//!
//! Named tables addressed by 1-based row and column, the way a spreadsheet
//! is. The intake logic only needs lookup by name, the last written row, and
//! rectangular range reads and writes.

mod local;
mod memory;

pub use local::{LocalTable, LocalTableStore};
pub use memory::{MemoryTable, MemoryTableStore};

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A single named table
#[async_trait]
pub trait Table: Send + Sync {
    /// Table name
    fn name(&self) -> &str;

    /// Index of the last row holding any data (0 when nothing was written)
    async fn last_row(&self) -> Result<usize>;

    /// Read rows `top..=bottom` and columns `left..=right` (1-based, inclusive)
    ///
    /// Cells beyond the written area come back as empty strings, so every
    /// returned row has exactly `right - left + 1` cells.
    async fn read_range(
        &self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Result<Vec<Vec<String>>>;

    /// Write `values` with its top-left cell at (`row`, `col`) as one operation
    async fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> Result<()>;
}

/// A collection of named tables
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Table names in store order
    async fn sheet_names(&self) -> Result<Vec<String>>;

    /// Look up a table by name
    async fn table(&self, name: &str) -> Result<Option<Arc<dyn Table>>>;

    /// Create a table, or return the existing one with that name
    async fn create_sheet(&self, name: &str) -> Result<Arc<dyn Table>>;
}

/// Last non-empty row of a grid (1-based, 0 if none)
pub(crate) fn grid_last_row(grid: &[Vec<String>]) -> usize {
    grid.iter()
        .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
        .map_or(0, |idx| idx + 1)
}

/// Copy out an inclusive 1-based range, padding with empty cells
pub(crate) fn grid_read(
    grid: &[Vec<String>],
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
) -> Result<Vec<Vec<String>>> {
    if top == 0 || left == 0 {
        return Err(Error::StoreWrite(format!(
            "range origin ({top}, {left}) is not 1-based"
        )));
    }
    if bottom < top || right < left {
        return Ok(Vec::new());
    }

    Ok((top..=bottom)
        .map(|r| {
            let row = grid.get(r - 1);
            (left..=right)
                .map(|c| {
                    row.and_then(|cells| cells.get(c - 1))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect())
}

/// Overwrite a block of cells, growing the grid as needed
pub(crate) fn grid_write(
    grid: &mut Vec<Vec<String>>,
    row: usize,
    col: usize,
    values: &[Vec<String>],
) -> Result<()> {
    if row == 0 || col == 0 {
        return Err(Error::StoreWrite(format!(
            "range origin ({row}, {col}) is not 1-based"
        )));
    }

    for (offset, values_row) in values.iter().enumerate() {
        let r = row - 1 + offset;
        if grid.len() <= r {
            grid.resize_with(r + 1, Vec::new);
        }
        let cells = &mut grid[r];
        let needed = col - 1 + values_row.len();
        if cells.len() < needed {
            cells.resize(needed, String::new());
        }
        for (c, value) in values_row.iter().enumerate() {
            cells[col - 1 + c].clone_from(value);
        }
    }
    Ok(())
}

/// Reject names that cannot double as a file name
pub(crate) fn validate_sheet_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(Error::Validation(format!("Invalid sheet name: \"{name}\"")));
    }
    Ok(())
}
