//! File readers for the spreadsheet loader.
//!
//! Excel/OpenDocument workbooks go through calamine (first sheet only),
//! `.csv` through the csv crate. Cells are converted to display text.

use super::{SheetError, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

/// Date cells always carry a time part, so they never look like a phone number.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];

/// Open a spreadsheet file and return its first sheet as a [`Table`].
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table, SheetError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let raw = if ext == "csv" {
        read_csv_rows(path)?
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_workbook_rows(path)?
    } else {
        return Err(SheetError::UnsupportedFormat(path.display().to_string()));
    };

    let table = Table::from_rows(raw)?;
    info!(
        path = %path.display(),
        columns = table.column_count(),
        rows = table.row_count(),
        "loaded spreadsheet"
    );
    Ok(table)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;
    debug!(sheet = %first, "reading first worksheet");

    let range = workbook.worksheet_range(&first)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Render a workbook cell the way a user sees it.
///
/// Integral floats drop the fractional part so phone numbers stored as
/// numbers come back as plain digits. Dates render as text, not as their
/// serial number.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(at) => at.format(DATETIME_FORMAT).to_string(),
            None => format!("{:?}", dt),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{:?}", e),
    }
}

fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::detect_and_normalize;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_float_cells_render_without_decimals() {
        assert_eq!(cell_text(&Data::Float(3001234567.0)), "3001234567");
        assert_eq!(cell_text(&Data::Float(923001234567.0)), "923001234567");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn test_other_cells() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::String("0300-1234567".into())), "0300-1234567");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
    }

    fn date_cell(serial: f64) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false))
    }

    #[test]
    fn test_date_cell_renders_as_text() {
        let joined = date_cell(45000.0);
        assert_eq!(cell_text(&joined), "2023-03-15 00:00:00");
    }

    #[test]
    fn test_date_column_is_not_taken_for_numbers() {
        let joined = date_cell(45000.0);
        let table = Table::new(
            vec!["Joined".to_string(), "Number".to_string()],
            vec![vec![cell_text(&joined), cell_text(&Data::Float(3001234567.0))]],
        );

        let detection = detect_and_normalize(&table).unwrap();
        assert_eq!(detection.column.name, "Number");
        assert_eq!(detection.accepted.len(), 1);
        assert_eq!(detection.accepted[0].as_str(), "+923001234567");
    }

    #[test]
    fn test_read_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Name,Mobile No").unwrap();
        writeln!(file, "Ali,0300-1234567").unwrap();
        writeln!(file, "Sara").unwrap();

        let table = read_table(file.path()).unwrap();
        assert_eq!(table.headers(), &["Name".to_string(), "Mobile No".to_string()][..]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1], vec!["Sara".to_string(), String::new()]);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            read_table(file.path()),
            Err(SheetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_empty_csv_has_no_header() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert!(matches!(read_table(file.path()), Err(SheetError::EmptySheet)));
    }
}
