//! Output of fit results
//!
//! - **Export**: the linearized data table (CSV)
//! - **Chart**: the linearized plot, as a Veusz project or a rendered image
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── export/             ← Data export
//! │   ├── mod.rs          ← Exporter trait
//! │   └── csv.rs
//! └── chart/              ← Chart construction
//!     ├── mod.rs          ← ChartBuilder trait, Langmuir chart recipe
//!     ├── veusz.rs        ← .vsz project backend
//!     └── plot.rs         ← plotters PNG/SVG backend
//! ```
//!
//! The numeric kernel never touches this module: it hands over a
//! [`LangmuirFit`](crate::models::LangmuirFit) and the collaborators here
//! decide how it is written.

pub mod chart;
pub mod export;

use thiserror::Error;

pub use chart::{
    build_langmuir_chart,
    Annotation,
    ChartBuilder,
    LabelTarget,
    PlotConfig,
    PlottedChart,
    Series,
    SeriesStyle,
    VeuszProject,
};

pub use export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};

/// Errors raised while writing output artifacts
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Data length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Drawing backend failure
    #[error("Plot error: {0}")]
    Plot(String),
}
