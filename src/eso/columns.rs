//! Column-major storage for accumulated data rows.
//!
//! Rows are appended as they stream out of the data section and
//! transposed once when parsing completes, so "field 3 of every row"
//! becomes a single slice borrow instead of a row scan.

use crate::error::{Error, Result};

/// Accumulates rows for one report code, then holds them column-major.
#[derive(Debug, Clone, Default)]
pub struct ColumnStore {
    rows: Vec<Vec<String>>,
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl ColumnStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Transpose the accumulated rows into column-major storage.
    ///
    /// An empty row list transposes to an empty column list. Ragged rows
    /// transpose at the shortest row width.
    pub(crate) fn finalize(&mut self) {
        self.row_count = self.rows.len();
        let width = self.rows.iter().map(Vec::len).min().unwrap_or(0);
        let mut columns = vec![Vec::with_capacity(self.row_count); width];
        for row in self.rows.drain(..) {
            for (i, value) in row.into_iter().take(width).enumerate() {
                columns[i].push(value);
            }
        }
        self.columns = columns;
    }

    /// Number of data rows recorded for this report code.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Borrow one column. A column index beyond the stored width yields an
    /// empty slice, so zero-period buckets read as empty sequences rather
    /// than panicking.
    pub fn column(&self, index: usize) -> &[String] {
        self.columns.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parse a column of integer-looking fields.
///
/// The same logical field can appear as "1" in one report code and
/// "1.00" in another, so a plain integer parse falls back to a float
/// parse with truncation.
pub(crate) fn parse_ints(values: &[String], context: &str) -> Result<Vec<i64>> {
    values
        .iter()
        .map(|v| {
            v.parse::<i64>()
                .ok()
                .or_else(|| v.parse::<f64>().ok().map(|f| f as i64))
                .ok_or_else(|| Error::number_format(v.as_str(), context))
        })
        .collect()
}

/// Parse a column of float fields.
pub(crate) fn parse_floats(values: &[String], context: &str) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| Error::number_format(v.as_str(), context))
        })
        .collect()
}
