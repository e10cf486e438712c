//! Measurement input
//!
//! Reads the two concentration columns of an isotherm sheet. The sheet's
//! first row is a header. Below it, empty and error cells are dropped per
//! column, so the two columns may come back with different lengths; pairing
//! and truncation is left to [`SampleSet`](crate::models::SampleSet).
//!
//! Supported sources:
//!
//! | Extension | Reader                | Sheet selection |
//! |-----------|-----------------------|-----------------|
//! | `.xlsx`   | [`xlsx::XlsxSheet`]   | by name         |
//! | `.csv`    | [`csv::CsvSheet`]     | n/a             |
//!
//! A text or boolean cell inside a selected column is a type error
//! ([`InputError::NonNumeric`]); the run aborts rather than guessing.

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::Path;

use log::debug;
use thiserror::Error;

pub use self::csv::CsvSheet;
pub use self::xlsx::XlsxSheet;

// =================================================================================================
// Errors
// =================================================================================================

/// Errors raised while reading measurement columns
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// A required part of the XLSX package is absent
    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Sheet '{name}' not found (available: {available})")]
    SheetNotFound { name: String, available: String },

    #[error("Invalid cell reference '{0}'")]
    InvalidCellReference(String),

    /// Unsupported file extension
    #[error("Unsupported input format '{0}' (expected .xlsx or .csv)")]
    UnsupportedFormat(String),

    /// Non-numeric cell in a numeric column
    #[error("Non-numeric value {value} in column {column}, row {row}")]
    NonNumeric {
        column: usize,
        row: u32,
        value: CellValue,
    },
}

// =================================================================================================
// Cells
// =================================================================================================

/// Content of a single cell, as far as column extraction cares
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    /// Spreadsheet error such as `#DIV/0!`, read as missing
    Error(String),
    Empty,
}

impl CellValue {
    /// Whether the cell counts as a missing value
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error(_) => true,
            CellValue::Number(v) => v.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Boolean(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "'{}'", s),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Empty => write!(f, "<empty>"),
        }
    }
}

/// A cell with its 1-based row number and 0-based column index
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub column: usize,
    pub value: CellValue,
}

/// Extract the numeric values of one column below the header row
///
/// `cells` must be in row order. Missing values are skipped.
pub fn numeric_column(
    cells: &[Cell],
    header_row: u32,
    column: usize,
) -> Result<Vec<f64>, InputError> {
    let mut values = Vec::new();

    for cell in cells
        .iter()
        .filter(|c| c.column == column && c.row > header_row)
    {
        if cell.value.is_missing() {
            continue;
        }
        match &cell.value {
            CellValue::Number(v) => values.push(*v),
            other => {
                return Err(InputError::NonNumeric {
                    column,
                    row: cell.row,
                    value: other.clone(),
                })
            }
        }
    }

    Ok(values)
}

// =================================================================================================
// Sources
// =================================================================================================

/// A tabular source of measurement columns
pub trait ColumnSource {
    /// All non-empty cells in row order
    fn cells(&mut self) -> Result<Vec<Cell>, InputError>;

    /// Numeric values of `column`, header skipped, missing values dropped
    fn numeric_column(&mut self, column: usize) -> Result<Vec<f64>, InputError> {
        let cells = self.cells()?;
        let header_row = cells.first().map(|c| c.row).unwrap_or(0);
        numeric_column(&cells, header_row, column)
    }

    /// Numeric values of two columns, read in a single pass
    fn numeric_columns(
        &mut self,
        first: usize,
        second: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), InputError> {
        let cells = self.cells()?;
        let header_row = cells.first().map(|c| c.row).unwrap_or(0);
        Ok((
            numeric_column(&cells, header_row, first)?,
            numeric_column(&cells, header_row, second)?,
        ))
    }
}

/// Read the C_e and adsorbed concentration columns of a sheet
///
/// The reader is chosen from the file extension; `sheet` is only used for
/// workbooks.
///
/// # Example
///
/// ```rust,ignore
/// use langmuir_fit::input::read_columns;
///
/// let (c_e, c_adsorbed) = read_columns("pp5 data 2025.xlsx", "Sheet2", 2, 3)?;
/// ```
pub fn read_columns(
    path: impl AsRef<Path>,
    sheet: &str,
    ce_column: usize,
    adsorbed_column: usize,
) -> Result<(Vec<f64>, Vec<f64>), InputError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let (c_e, c_adsorbed) = match ext.as_str() {
        "xlsx" | "xlsm" => XlsxSheet::open(path, sheet)?.numeric_columns(ce_column, adsorbed_column)?,
        "csv" => CsvSheet::open(path).numeric_columns(ce_column, adsorbed_column)?,
        _ => return Err(InputError::UnsupportedFormat(ext)),
    };

    debug!(
        "Read {} C_e and {} C_adsorbed values from {}",
        c_e.len(),
        c_adsorbed.len(),
        path.display()
    );

    Ok((c_e, c_adsorbed))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u32, column: usize, value: CellValue) -> Cell {
        Cell { row, column, value }
    }

    #[test]
    fn test_numeric_column_skips_header_and_missing() {
        let cells = vec![
            cell(1, 0, CellValue::Text("Ce (mol/L)".into())),
            cell(2, 0, CellValue::Number(0.1)),
            cell(3, 0, CellValue::Empty),
            cell(4, 0, CellValue::Error("#DIV/0!".into())),
            cell(5, 0, CellValue::Number(0.5)),
            cell(5, 1, CellValue::Number(9.0)),
        ];
        assert_eq!(numeric_column(&cells, 1, 0).unwrap(), vec![0.1, 0.5]);
        assert_eq!(numeric_column(&cells, 1, 1).unwrap(), vec![9.0]);
    }

    #[test]
    fn test_numeric_column_rejects_text() {
        let cells = vec![
            cell(1, 0, CellValue::Text("Ce".into())),
            cell(2, 0, CellValue::Number(0.1)),
            cell(3, 0, CellValue::Text("n/d".into())),
        ];
        let err = numeric_column(&cells, 1, 0).unwrap_err();
        assert!(matches!(err, InputError::NonNumeric { column: 0, row: 3, .. }));
    }

    #[test]
    fn test_numeric_column_rejects_boolean() {
        let cells = vec![cell(2, 3, CellValue::Boolean(true))];
        assert!(numeric_column(&cells, 1, 3).is_err());
    }

    #[test]
    fn test_blank_text_is_missing() {
        assert!(CellValue::Text("   ".into()).is_missing());
        assert!(CellValue::Number(f64::NAN).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_columns("data.ods", "Sheet1", 0, 1).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedFormat(ref e) if e == "ods"));
    }

    #[test]
    fn test_non_numeric_message() {
        let err = InputError::NonNumeric {
            column: 2,
            row: 7,
            value: CellValue::Text("n/d".into()),
        };
        assert_eq!(err.to_string(), "Non-numeric value 'n/d' in column 2, row 7");
    }
}
