//! First-blank-row search

use crate::error::Result;
use crate::store::Table;
use crate::types::ROW_WIDTH;

/// Whether a row's cells concatenate to nothing but whitespace
pub fn is_blank_row(cells: &[String]) -> bool {
    cells.concat().trim().is_empty()
}

/// Find the first row whose first [`ROW_WIDTH`] columns are blank
///
/// Returns 1 for an empty table, the first blank row among
/// `1..=last_row`, or `last_row + 1` when there is none. Data in columns
/// past [`ROW_WIDTH`] does not make a row non-blank.
pub async fn find_first_blank_row(table: &dyn Table) -> Result<usize> {
    let last_row = table.last_row().await?;
    if last_row == 0 {
        return Ok(1);
    }

    let values = table.read_range(1, 1, last_row, ROW_WIDTH).await?;
    Ok(values
        .iter()
        .position(|cells| is_blank_row(cells))
        .map_or(last_row + 1, |idx| idx + 1))
}
