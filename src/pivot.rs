// ABOUTME: Pivots row-major query results into chart series
// ABOUTME: Splits the category column from value columns and derives the y-axis bound

use thiserror::Error;

use crate::models::{Cell, SeriesBundle};

/// Headroom above the largest value when deriving the y-axis bound
pub const Y_BOUND_HEADROOM: f64 = 1.5;

#[derive(Error, Debug, PartialEq)]
pub enum PivotError {
    #[error("Query returned no rows")]
    EmptyResultSet,
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Transpose rows into a category sequence plus one sequence per value column
pub fn pivot(rows: Vec<Vec<Cell>>) -> Result<SeriesBundle, PivotError> {
    // Zero-width rows leave no category column to chart against
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(PivotError::EmptyResultSet);
    }

    let mut columns: Vec<Vec<Cell>> = (0..width)
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();
    for (index, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(PivotError::RaggedRow {
                row: index,
                expected: width,
                found: row.len(),
            });
        }
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(cell);
        }
    }

    let mut columns = columns.into_iter();
    let categories = columns.next().unwrap_or_default();
    let values: Vec<Vec<Cell>> = columns.collect();
    let (y_bound, skipped) = derive_y_bound(&values);

    Ok(SeriesBundle {
        categories,
        values,
        y_bound,
        skipped,
    })
}

/// Largest value across the numeric sequences times the headroom, rounded up.
///
/// A sequence containing any non-numeric cell is left out entirely and its
/// index returned alongside the bound.
fn derive_y_bound(values: &[Vec<Cell>]) -> (Option<f64>, Vec<usize>) {
    let mut skipped = Vec::new();
    let mut max: Option<f64> = None;

    for (index, series) in values.iter().enumerate() {
        let numbers: Option<Vec<f64>> = series.iter().map(Cell::as_f64).collect();
        match numbers {
            Some(numbers) => {
                for n in numbers {
                    max = Some(max.map_or(n, |m| m.max(n)));
                }
            }
            None => skipped.push(index),
        }
    }

    (max.map(|m| (m * Y_BOUND_HEADROOM).ceil()), skipped)
}
