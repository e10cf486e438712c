//! Crate-level error type
//!
//! Each concern keeps its own error enum; [`Error`] wraps them so that the
//! full pipeline ([`run`](crate::run)) can use `?` across stages.

use thiserror::Error;

use crate::input::InputError;
use crate::models::FitError;
use crate::output::ExportError;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading the measurement sheet failed
    #[error("input: {0}")]
    Input(#[from] InputError),

    /// The data cannot be fitted
    #[error("fit: {0}")]
    Fit(#[from] FitError),

    /// Writing the table, project or preview failed
    #[error("output: {0}")]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_fit_error() {
        let err: Error = FitError::ZeroIntercept.into();
        assert!(matches!(err, Error::Fit(FitError::ZeroIntercept)));
        assert!(err.to_string().starts_with("fit: "));
    }

    #[test]
    fn test_wraps_export_error() {
        let err: Error = ExportError::EmptyData("no rows".into()).into();
        assert_eq!(err.to_string(), "output: Empty data: no rows");
    }
}
