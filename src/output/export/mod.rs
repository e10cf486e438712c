//! Export of fit results
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file that leaves the existing ones untouched.
//!
//! # Available formats
//!
//! | Format  | Module      |
//! |---------|-------------|
//! | CSV     | [`csv`]     |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use langmuir_fit::output::export::{CsvExporter, Exporter};
//!
//! CsvExporter::default().export_fit(&fit, Path::new("langmuir_data.csv"))?;
//! ```

pub mod csv;

pub use self::csv::{CsvConfig, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::models::LangmuirFit;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so the
/// caller can react to the precise failure without downcasting.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports the linearized samples and fitted line of `fit`.
    ///
    /// One record per sample, in input order, with the columns
    /// `1/C_e`, `1/q_e` and the fitted `1/q_e`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path is invalid or the directory does not exist
    /// - `fit` contains no samples or non-finite values
    fn export_fit(&self, fit: &LangmuirFit, path: &Path) -> Result<(), Self::Error>;
}
