//! CSV sheet reader
//!
//! Same layout as a worksheet: one header line, then one measurement per
//! line. Common missing-value markers are treated as empty cells.

use std::path::{Path, PathBuf};

use ::csv::ReaderBuilder;

use super::{Cell, CellValue, ColumnSource, InputError};

/// Tokens read as a missing value
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL"];

/// A delimited text file read as a single sheet
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSheet {
    /// Comma-delimited sheet at `path`; the file is read lazily
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => CellValue::Number(v),
        Err(_) => match trimmed.to_ascii_lowercase().as_str() {
            "true" => CellValue::Boolean(true),
            "false" => CellValue::Boolean(false),
            _ => CellValue::Text(trimmed.to_string()),
        },
    }
}

impl ColumnSource for CsvSheet {
    fn cells(&mut self) -> Result<Vec<Cell>, InputError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut cells = Vec::new();

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .position()
                .map(|p| p.line() as u32)
                .unwrap_or(line as u32 + 1);
            for (column, field) in record.iter().enumerate() {
                let value = parse_field(field);
                if value != CellValue::Empty {
                    cells.push(Cell { row, column, value });
                }
            }
        }

        Ok(cells)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
