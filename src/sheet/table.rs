//! In-memory table: one header row plus data rows of cell text.

use super::SheetError;
use serde::Serialize;

/// A loaded sheet. Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from raw rows, treating the first row as the header.
    ///
    /// Empty header cells are named `Column{n}` after their 0-based index;
    /// other headers are kept verbatim. Short rows are padded with empty
    /// cells and long rows truncated, so the column count is the same
    /// everywhere.
    pub fn from_rows(mut raw: Vec<Vec<String>>) -> Result<Self, SheetError> {
        if raw.is_empty() {
            return Err(SheetError::EmptySheet);
        }
        let header_row = raw.remove(0);

        let headers: Vec<String> = header_row
            .into_iter()
            .enumerate()
            .map(|(i, h)| if h.is_empty() { format!("Column{}", i) } else { h })
            .collect();

        let width = headers.len();
        let rows = raw
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Build a table from explicit headers and rows (rows are squared off).
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}
