//! Spreadsheet import: workbook/CSV files into a header + rows table.
//!
//! CHANGELOG:
//! - 10/16/2026 - Added CSV support alongside calamine workbooks
//! - 10/16/2026 - Initial implementation

pub mod reader;
pub mod table;

pub use reader::read_table;
pub use table::Table;

use thiserror::Error;

/// Errors raised while loading a spreadsheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Sheet has no header row")]
    EmptySheet,
}
