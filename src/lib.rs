//! langmuir-fit: Linearized Langmuir Isotherm Fitting
//!
//! Fits batch adsorption measurements to the Langmuir isotherm by linear
//! regression of $1/q_e$ against $1/C_e$, then writes the linearized data
//! table and a chart project for inspection.
//!
//! # Architecture
//!
//! langmuir-fit keeps the numerics apart from every file format:
//!
//! 1. **Pure kernel** ([`models`])
//!    - Sample pairing, q_e conversion, least squares, derived constants
//!    - No I/O, deterministic, errors are values
//!
//! 2. **Collaborators** ([`input`], [`output`])
//!    - Spreadsheet reading (XLSX, CSV)
//!    - Tabular export and chart construction behind traits
//!
//! # Quick Start
//!
//! ```rust
//! use langmuir_fit::prelude::*;
//!
//! # fn main() -> Result<(), FitError> {
//! // 1. Physical constants of the batch experiment
//! let constants = PhysicalConstants::new(
//!     243.29,   // molar mass (g/mol)
//!     0.025,    // solution volume (L)
//!     0.2,      // adsorbent mass (g)
//! )?;
//!
//! // 2. Equilibrium and adsorbed concentrations (mol/L)
//! let c_e = [0.1, 0.2, 0.5];
//! let c_adsorbed = [0.01, 0.015, 0.02];
//!
//! // 3. Fit
//! let fit = compute_langmuir_fit(&c_e, &c_adsorbed, &constants)?;
//!
//! // 4. Access results
//! println!("{}", fit.summary());
//! assert_eq!(fit.fitted.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Physical constants and run configuration
//! - [`models`]: Regression and Langmuir fit (pure)
//! - [`input`]: Measurement columns from XLSX/CSV sheets
//! - [`output`]: CSV export and chart backends
//! - [`error`]: Crate-level error type

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;

use log::info;

use crate::config::FitConfig;
use crate::models::{fit_samples, LangmuirFit, SampleSet};
use crate::output::chart::build_langmuir_chart_with_columns;
use crate::output::{ChartBuilder, CsvExporter, Exporter, PlotConfig, PlottedChart, VeuszProject};

pub use crate::error::{Error, Result};

/// Run the full pipeline described by `config`
///
/// Reads the two columns, fits, writes the CSV table, then the Veusz
/// project linked to it and, if configured, a preview image. Nothing is
/// written when reading or fitting fails. Outputs are written in that
/// order and not rolled back: if the project or preview export fails,
/// the CSV table (and the project, for a failed preview) stays on disk.
pub fn run(config: &FitConfig) -> Result<LangmuirFit> {
    let (c_e, c_adsorbed) = input::read_columns(
        &config.input,
        &config.sheet,
        config.ce_column,
        config.adsorbed_column,
    )?;

    let samples = SampleSet::new(&c_e, &c_adsorbed);
    let fit = fit_samples(&samples, &config.constants)?;
    info!(
        "Fitted {} samples: q_m = {}, K_L = {}, R² = {}",
        fit.len(),
        fit.q_m,
        fit.k_l,
        fit.r_squared
    );

    let exporter = CsvExporter::default();
    exporter.export_fit(&fit, &config.csv_output)?;
    let columns = exporter.config.headers();

    let mut project = VeuszProject::new(config.linked_data_file());
    build_langmuir_chart_with_columns(&mut project, &fit, columns);
    project.export(&config.project_output)?;

    if let Some(preview) = &config.preview {
        let mut chart = PlottedChart::new(PlotConfig::linearized());
        build_langmuir_chart_with_columns(&mut chart, &fit, columns);
        chart.export(preview)?;
    }

    Ok(fit)
}

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use langmuir_fit::prelude::*;
    //! ```
    pub use crate::config::{FitConfig, PhysicalConstants};
    pub use crate::models::{
        compute_langmuir_fit,
        FitError,
        FitSummary,
        LangmuirFit,
        LinearRegression,
        SampleSet,
    };
    pub use crate::output::{
        build_langmuir_chart,
        ChartBuilder,
        CsvExporter,
        Exporter,
        PlottedChart,
        VeuszProject,
    };
}
