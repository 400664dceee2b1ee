//! Phone column detection and number normalization.
//!
//! CHANGELOG:
//! - 10/16/2026 - Keep per-row rejection detail for the load report
//! - 10/16/2026 - Initial implementation

pub mod detect;
pub mod normalize;

pub use detect::{detect_phone_column, similarity, ColumnSelection, DetectionRule};
pub use normalize::{normalize, CanonicalNumber};

use crate::sheet::Table;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum DetectError {
    #[error("Table has no columns")]
    NoColumns,
}

/// A row whose value did not normalize to a canonical number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// 1-based data row (the header is not counted)
    pub row: usize,
    pub raw: String,
    pub cleaned: String,
}

/// Result of importing numbers from a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub column: ColumnSelection,
    pub accepted: Vec<CanonicalNumber>,
    pub rejected: Vec<Rejection>,
    pub rejected_count: usize,
}

impl Detection {
    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.rejected_count
    }
}

/// Detect the phone column and normalize every row's value in it.
///
/// Accepted numbers keep row order; rejected rows are dropped from the list
/// and counted.
pub fn detect_and_normalize(table: &Table) -> Result<Detection, DetectError> {
    let column = detect_phone_column(table).ok_or(DetectError::NoColumns)?;
    info!(column = %column.name, "detected phone column");

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (i, raw) in table.column(column.index).enumerate() {
        match normalize(raw) {
            Ok(number) => {
                debug!(row = i + 1, %number, "accepted");
                accepted.push(number);
            }
            Err(cleaned) => {
                debug!(row = i + 1, raw, cleaned = %cleaned, "rejected");
                rejected.push(Rejection {
                    row: i + 1,
                    raw: raw.to_string(),
                    cleaned,
                });
            }
        }
    }

    let rejected_count = rejected.len();
    info!(
        accepted = accepted.len(),
        rejected = rejected_count,
        "parsed phone numbers"
    );

    Ok(Detection {
        column,
        accepted,
        rejected,
        rejected_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_mixed_rows_add_up() {
        let t = table(
            &["Name", "Mobile"],
            &[
                &["A", "03001234567"],
                &["B", "12345"],
                &["C", ""],
                &["D", "0092 300 7654321"],
                &["E", "923331112222"],
            ],
        );
        let d = detect_and_normalize(&t).unwrap();
        assert_eq!(d.column.index, 1);
        let accepted: Vec<&str> = d.accepted.iter().map(|n| n.as_str()).collect();
        assert_eq!(
            accepted,
            vec!["+923001234567", "+923007654321", "+923331112222"]
        );
        assert_eq!(d.rejected_count, 2);
        assert_eq!(d.rejected[0].row, 2);
        assert_eq!(d.rejected[1].raw, "");
        assert_eq!(d.total_rows(), t.row_count());
    }

    #[test]
    fn test_no_columns_is_error() {
        let t = table(&[], &[]);
        assert_eq!(detect_and_normalize(&t), Err(DetectError::NoColumns));
    }
}
