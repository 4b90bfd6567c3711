//! Dual-table append
//!
//! The same batch goes to the per-sheet table and the consolidated table.
//! Each table gets its own blank-row search, so the two are not assumed to
//! be row-aligned. There is no rollback across tables: if the consolidated
//! write fails, the primary table keeps its rows.

use crate::error::{Error, Result};
use crate::intake::locator::find_first_blank_row;
use crate::store::Table;
use crate::types::Row;
use tracing::{debug, error};

/// Where a batch landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// First row written in the primary table
    pub primary_row: usize,
    /// First row written in the consolidated table
    pub consolidated_row: usize,
    /// Number of rows written to each table
    pub rows_written: usize,
}

fn store_error(table: &dyn Table, err: Error) -> Error {
    match err {
        Error::StoreWrite(_) => err,
        other => Error::StoreWrite(format!("{}: {other}", table.name())),
    }
}

/// Append `rows` to both tables, one bulk write per table
pub async fn append_rows(
    primary: &dyn Table,
    consolidated: &dyn Table,
    rows: &[Row],
) -> Result<AppendOutcome> {
    if rows.is_empty() {
        return Err(Error::Validation("At least one entry is required.".to_string()));
    }

    let primary_row = find_first_blank_row(primary)
        .await
        .map_err(|e| store_error(primary, e))?;
    let consolidated_row = find_first_blank_row(consolidated)
        .await
        .map_err(|e| store_error(consolidated, e))?;
    debug!(
        "Appending {} row(s): {} at {primary_row}, {} at {consolidated_row}",
        rows.len(),
        primary.name(),
        consolidated.name()
    );

    let values: Vec<Vec<String>> = rows.iter().map(|r| r.cells().to_vec()).collect();

    primary
        .write_range(primary_row, 1, &values)
        .await
        .map_err(|e| store_error(primary, e))?;

    if let Err(e) = consolidated.write_range(consolidated_row, 1, &values).await {
        error!(
            "Rows written to {} but not to {}: {e}",
            primary.name(),
            consolidated.name()
        );
        return Err(store_error(consolidated, e));
    }

    Ok(AppendOutcome {
        primary_row,
        consolidated_row,
        rows_written: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTable;
    use crate::types::{Entry, Submission};
    use chrono::NaiveDate;

    fn make_rows(labels: &[&str]) -> Vec<Row> {
        let submission = Submission {
            email: "ana@example.com".to_string(),
            selected_sheet: "North".to_string(),
            note: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            send_copy: false,
            entries: labels
                .iter()
                .map(|l| Entry {
                    checkbox_label: (*l).to_string(),
                    ..Entry::default()
                })
                .collect(),
        };
        crate::types::build_rows(&submission, "2026-10-01 12:00:00")
    }

    fn occupied(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![format!("old{i}")]).collect()
    }

    #[tokio::test]
    async fn test_start_rows_found_independently() {
        let primary = MemoryTable::with_rows("North", occupied(1));
        let consolidated = MemoryTable::with_rows("Consolidated", occupied(4));

        let outcome = append_rows(&primary, &consolidated, &make_rows(&["A", "B"]))
            .await
            .unwrap();

        assert_eq!(outcome.primary_row, 2);
        assert_eq!(outcome.consolidated_row, 5);
        assert_eq!(outcome.rows_written, 2);
        assert_eq!(primary.rows()[1][6], "A");
        assert_eq!(primary.rows()[2][6], "B");
        assert_eq!(consolidated.rows()[4], primary.rows()[1]);
        assert_eq!(consolidated.rows()[5], primary.rows()[2]);
    }

    #[tokio::test]
    async fn test_batch_longer_than_gap_overwrites_rows_below() {
        let primary = MemoryTable::with_rows(
            "North",
            vec![vec!["old0".to_string()], vec![String::new()], vec!["old2".to_string()]],
        );
        let consolidated = MemoryTable::with_rows("Consolidated", vec![]);

        let outcome = append_rows(&primary, &consolidated, &make_rows(&["A", "B"]))
            .await
            .unwrap();

        // The batch starts in the one-row gap and runs over row 3
        assert_eq!(outcome.primary_row, 2);
        assert_eq!(outcome.consolidated_row, 1);
        let rows = primary.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["old0"]);
        assert_eq!(rows[1][6], "A");
        assert_eq!(rows[2][6], "B");
        assert!(rows.iter().all(|r| !r.contains(&"old2".to_string())));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let primary = MemoryTable::with_rows("North", vec![]);
        let consolidated = MemoryTable::with_rows("Consolidated", vec![]);

        let err = append_rows(&primary, &consolidated, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(primary.rows().is_empty());
    }
}
