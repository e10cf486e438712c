//! Common utilities for integration tests

#![allow(dead_code)]

pub mod datasets;
pub mod workbook;

// Re-export commonly used items
pub use datasets::{langmuir_dataset, relative_error, unit_constants, LangmuirDataset};
pub use workbook::{write_csv_sheet, write_xlsx_sheet, Column};
