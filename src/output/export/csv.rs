//! CSV export of the linearized isotherm
//!
//! Writes the reciprocal-transform samples and the fitted line as three
//! columns, one row per sample, in input order. The default layout is the
//! one the Veusz project links to:
//!
//! ```csv
//! inv_Ce,inv_qe,fit_qe
//! 10,0.0032882...,0.0032561...
//! 5,0.0021921...,0.0022468...
//! 2,0.0016441...,0.0016413...
//! ```
//!
//! # Number formatting
//!
//! With `precision: None` (default) values are written in the shortest form
//! that parses back to the same `f64`, so nothing is lost between the
//! calculation and the chart. `Some(n)` fixes `n` decimal places.
//!
//! # With Metadata
//!
//! ```rust,ignore
//! use langmuir_fit::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//!
//! let metadata = CsvMetadata::from_fit(&fit, &constants);
//! let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
//! exporter.export_fit(&fit, Path::new("langmuir_data.csv"))?;
//! ```
//!
//! **Output**:
//! ```csv
//! # Langmuir Isotherm Fit Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Samples: 3
//! # q_m: 625.3 mg/g
//! # ...
//! #
//! inv_Ce,inv_qe,fit_qe
//! ...
//! ```
//!
//! The pipeline writes the table without metadata, as the project links it
//! with a plain CSV import.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::Exporter;
use crate::config::PhysicalConstants;
use crate::models::LangmuirFit;
use crate::output::ExportError;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use langmuir_fit::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(8);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.decimal_separator, ',');
/// assert_eq!(config.precision, Some(8));
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Fixed number of decimal places; `None` keeps full precision (default)
    pub precision: Option<usize>,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the `1/C_e` column (default: "inv_Ce")
    pub x_header: String,

    /// Header of the `1/q_e` column (default: "inv_qe")
    pub y_header: String,

    /// Header of the fitted line column (default: "fit_qe")
    pub fit_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: None,
            include_metadata: false,
            metadata: None,
            x_header: "inv_Ce".to_string(),
            y_header: "inv_qe".to_string(),
            fit_header: "fit_qe".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon delimiter, comma decimal separator)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set fixed precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    /// Column headers in output order
    pub fn headers(&self) -> [&str; 3] {
        [&self.x_header, &self.y_header, &self.fit_header]
    }
}

/// Metadata for CSV header comments
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Source spreadsheet
    pub source: Option<String>,

    /// Number of samples in the fit
    pub samples: Option<usize>,

    /// Monolayer capacity (mg/g)
    pub q_m: Option<f64>,

    /// Langmuir constant
    pub k_l: Option<f64>,

    /// Coefficient of determination
    pub r_squared: Option<f64>,

    /// Physical constants of the q_e conversion
    pub constants: Option<PhysicalConstants>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing a finished fit
    pub fn from_fit(fit: &LangmuirFit, constants: &PhysicalConstants) -> Self {
        Self {
            samples: Some(fit.len()),
            q_m: Some(fit.q_m),
            k_l: Some(fit.k_l),
            r_squared: Some(fit.r_squared),
            constants: Some(*constants),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# Langmuir Isotherm Fit Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(source) = &metadata.source {
        writeln!(out, "# Source: {}", source)?;
    }
    if let Some(n) = metadata.samples {
        writeln!(out, "# Samples: {}", n)?;
    }
    if let Some(q_m) = metadata.q_m {
        writeln!(out, "# q_m: {} mg/g", q_m)?;
    }
    if let Some(k_l) = metadata.k_l {
        writeln!(out, "# K_L: {} L/mg", k_l)?;
    }
    if let Some(r2) = metadata.r_squared {
        writeln!(out, "# R²: {}", r2)?;
    }
    if let Some(c) = &metadata.constants {
        writeln!(out, "# Molar Mass: {} g/mol", c.molar_mass)?;
        writeln!(out, "# Volume: {} L", c.volume)?;
        writeln!(out, "# Adsorbent Mass: {} g", c.mass)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;
    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = match config.precision {
        Some(prec) => format!("{:.prec$}", value, prec = prec),
        None => format!("{}", value),
    };

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Write equal-length columns under `headers`
    ///
    /// # Errors
    ///
    /// - Empty data or header/column count mismatch
    /// - Columns of different lengths
    /// - NaN or Inf values
    /// - Write errors
    pub fn write_columns<W: Write>(
        &self,
        out: &mut W,
        headers: &[&str],
        columns: &[&[f64]],
    ) -> Result<(), ExportError> {

        // ============================= Validation =============================

        if columns.is_empty() || columns[0].is_empty() {
            return Err(ExportError::EmptyData(
                "at least one non-empty column is required".into(),
            ));
        }

        if headers.len() != columns.len() {
            return Err(ExportError::LengthMismatch(format!(
                "{} headers versus {} columns",
                headers.len(),
                columns.len()
            )));
        }

        let rows = columns[0].len();
        for (header, column) in headers.iter().zip(columns.iter()) {
            if column.len() != rows {
                return Err(ExportError::LengthMismatch(format!(
                    "column {} has {} values, expected {}",
                    header,
                    column.len(),
                    rows
                )));
            }
            if column.iter().any(|v| !v.is_finite()) {
                return Err(ExportError::InvalidData(format!(
                    "NaN or Inf detected in column {}",
                    header
                )));
            }
        }

        // ============================= Write Metadata =========================

        let config = &self.config;
        if config.include_metadata {
            if let Some(metadata) = &config.metadata {
                write_metadata_header(out, metadata)?;
            }
        }

        // ============================= Write Header ===========================

        let delimiter = config.delimiter.to_string();
        writeln!(out, "{}", headers.join(&delimiter))?;

        // ============================= Write Data =============================

        for i in 0..rows {
            let row: Vec<String> = columns
                .iter()
                .map(|column| format_number(column[i], config))
                .collect();
            writeln!(out, "{}", row.join(&delimiter))?;
        }

        Ok(())
    }

    /// Write the fit table to any writer
    pub fn write_fit<W: Write>(&self, out: &mut W, fit: &LangmuirFit) -> Result<(), ExportError> {
        self.write_columns(
            out,
            &self.config.headers(),
            &[
                fit.inv_ce.as_slice(),
                fit.inv_qe.as_slice(),
                fit.fitted.as_slice(),
            ],
        )
    }
}

impl Exporter for CsvExporter {
    type Error = ExportError;

    fn export_fit(&self, fit: &LangmuirFit, path: &Path) -> Result<(), Self::Error> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_fit(&mut out, fit)?;
        out.flush()?;

        info!("Wrote {} rows to {}", fit.len(), path.display());
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::compute_langmuir_fit;
    use std::fs;
    use tempfile::NamedTempFile;

    fn sample_fit() -> LangmuirFit {
        compute_langmuir_fit(
            &[0.1, 0.2, 0.5, 0.9],
            &[0.01, 0.015, 0.02, 0.021],
            &PhysicalConstants::default(),
        )
        .unwrap()
    }

    fn render(exporter: &CsvExporter, fit: &LangmuirFit) -> String {
        let mut buf = Vec::new();
        exporter.write_fit(&mut buf, fit).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_number_full_precision() {
        let config = CsvConfig::default();
        assert_eq!(format_number(0.1, &config), "0.1");
        assert_eq!(format_number(10.0, &config), "10");
        assert_eq!(format_number(1.0 / 3.0, &config), "0.3333333333333333");
    }

    #[test]
    fn test_format_number_fixed_precision() {
        let config = CsvConfig::default().precision(3);
        assert_eq!(format_number(1.0 / 3.0, &config), "0.333");

        let config = CsvConfig::european().precision(2);
        assert_eq!(format_number(2.5, &config), "2,50");
    }

    #[test]
    fn test_fit_table_layout() {
        let fit = sample_fit();
        let text = render(&CsvExporter::default(), &fit);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "inv_Ce,inv_qe,fit_qe");
        assert_eq!(lines.len(), fit.len() + 1);
        assert!(lines[1].starts_with("10,"));
        assert!(lines[2].starts_with("5,"));
        assert!(lines[3].starts_with("2,"));
    }

    #[test]
    fn test_fit_table_round_trips_values() {
        let fit = sample_fit();
        let text = render(&CsvExporter::default(), &fit);

        for (i, line) in text.lines().skip(1).enumerate() {
            let values: Vec<f64> = line.split(',').map(|v| v.parse().unwrap()).collect();
            assert_eq!(values, vec![fit.inv_ce[i], fit.inv_qe[i], fit.fitted[i]]);
        }
    }

    #[test]
    fn test_european_layout() {
        let fit = sample_fit();
        let text = render(&CsvExporter::new(CsvConfig::european().precision(4)), &fit);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "inv_Ce;inv_qe;fit_qe");
        assert!(lines[1].starts_with("10,0000;"));
    }

    #[test]
    fn test_metadata_header() {
        let fit = sample_fit();
        let mut metadata = CsvMetadata::from_fit(&fit, &PhysicalConstants::default());
        metadata.source = Some("pp5 data 2025.xlsx".into());
        metadata.add_custom("Adsorbate".into(), "PP5".into());

        let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
        let text = render(&exporter, &fit);

        assert!(text.starts_with("# Langmuir Isotherm Fit Data\n# Generated: "));
        assert!(text.contains("# Source: pp5 data 2025.xlsx\n"));
        assert!(text.contains("# Samples: 4\n"));
        assert!(text.contains("# Molar Mass: 243.29 g/mol\n"));
        assert!(text.contains("# Adsorbate: PP5\n"));
        assert!(text.contains("#\ninv_Ce,inv_qe,fit_qe\n"));
    }

    #[test]
    fn test_write_columns_validation() {
        let exporter = CsvExporter::default();
        let mut sink = Vec::new();

        let err = exporter.write_columns(&mut sink, &["a"], &[&[]]).unwrap_err();
        assert!(matches!(err, ExportError::EmptyData(_)));

        let err = exporter
            .write_columns(&mut sink, &["a", "b"], &[&[1.0, 2.0], &[1.0]])
            .unwrap_err();
        assert!(matches!(err, ExportError::LengthMismatch(_)));

        let err = exporter
            .write_columns(&mut sink, &["a"], &[&[1.0, f64::NAN]])
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidData(_)));

        let err = exporter
            .write_columns(&mut sink, &["a"], &[&[1.0], &[2.0]])
            .unwrap_err();
        assert!(matches!(err, ExportError::LengthMismatch(_)));
    }

    #[test]
    fn test_export_fit_to_file() {
        let fit = sample_fit();
        let tmp = NamedTempFile::new().unwrap();

        CsvExporter::default().export_fit(&fit, tmp.path()).unwrap();

        let content = fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.starts_with("inv_Ce,inv_qe,fit_qe\n"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let fit = sample_fit();
        let err = CsvExporter::default()
            .export_fit(&fit, Path::new("/nonexistent/dir/langmuir_data.csv"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
