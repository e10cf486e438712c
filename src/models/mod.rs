//! Adsorption models
//!
//! - [`regression`]: ordinary least-squares line fit
//! - [`langmuir`]: linearized Langmuir isotherm built on top of it

pub mod regression;
pub mod langmuir;

pub use regression::LinearRegression;
pub use langmuir::{
    compute_langmuir_fit,
    fit_samples,
    FitError,
    FitSummary,
    LangmuirFit,
    Quantity,
    SampleSet,
};
