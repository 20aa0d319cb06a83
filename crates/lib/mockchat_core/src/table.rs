//! Table payload validation.
//!
//! A table is only displayable when it has at least one header, at least one
//! row, and every row has exactly one cell per header.

use thiserror::Error;

use crate::models::TablePayload;

/// Reasons a table payload cannot be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table has no headers")]
    NoHeaders,

    #[error("table has no rows")]
    NoRows,

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Check that `table` satisfies the row-length invariant.
pub fn validate(table: &TablePayload) -> Result<(), TableError> {
    if table.headers.is_empty() {
        return Err(TableError::NoHeaders);
    }
    if table.rows.is_empty() {
        return Err(TableError::NoRows);
    }
    let expected = table.headers.len();
    for (row, cells) in table.rows.iter().enumerate() {
        if cells.len() != expected {
            return Err(TableError::RowLength {
                row,
                expected,
                actual: cells.len(),
            });
        }
    }
    Ok(())
}
