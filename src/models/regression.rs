//! Ordinary least-squares regression of `y` on `x`
//!
//! Closed-form estimators over centered data:
//!
//! ```text
//! Sxx = Σ(x - x̄)²     Syy = Σ(y - ȳ)²     Sxy = Σ(x - x̄)(y - ȳ)
//!
//! slope     m = Sxy / Sxx
//! intercept b = ȳ - m·x̄
//! r           = Sxy / √(Sxx·Syy)
//! ```
//!
//! The sums are evaluated with `nalgebra` column vectors. The result also
//! carries the standard errors of both coefficients, which the Langmuir
//! report uses to judge how well `q_m` and `K_L` are determined.

use log::debug;
use nalgebra::DVector;

use super::langmuir::FitError;

/// Result of a simple linear regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    /// Slope `m`
    pub slope: f64,

    /// Intercept `b`
    pub intercept: f64,

    /// Pearson correlation coefficient, clamped to `[-1, 1]`
    pub r_value: f64,

    /// Standard error of the slope (`None` when fewer than 3 samples)
    pub slope_stderr: Option<f64>,

    /// Standard error of the intercept (`None` when fewer than 3 samples)
    pub intercept_stderr: Option<f64>,

    /// Number of samples the line was fitted on
    pub n: usize,
}

impl LinearRegression {
    /// Fit `y = slope·x + intercept` by least squares
    ///
    /// # Errors
    ///
    /// - [`FitError::EmptyInput`] if either slice is empty
    /// - [`FitError::LengthMismatch`] if the slices differ in length
    /// - [`FitError::DegenerateAbscissa`] if every `x` is identical
    ///   (`Sxx = 0`, the slope has a zero denominator)
    ///
    /// When every `y` is identical (`Syy = 0`) the correlation is undefined
    /// and `r_value` is reported as `0.0`.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, FitError> {
        if x.is_empty() || y.is_empty() {
            return Err(FitError::EmptyInput);
        }
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }

        // Identical abscissae: their mean may round, leaving a spurious Sxx > 0
        if x.iter().all(|&v| v == x[0]) {
            return Err(FitError::DegenerateAbscissa);
        }

        let n = x.len();
        let xs = DVector::from_column_slice(x);
        let ys = DVector::from_column_slice(y);

        let x_mean = xs.mean();
        let y_mean = ys.mean();

        let dx = xs.add_scalar(-x_mean);
        let dy = ys.add_scalar(-y_mean);

        let sxx = dx.dot(&dx);
        let syy = dy.dot(&dy);
        let sxy = dx.dot(&dy);

        if sxx == 0.0 {
            return Err(FitError::DegenerateAbscissa);
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let r_value = if syy == 0.0 {
            0.0
        } else {
            (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
        };

        let (slope_stderr, intercept_stderr) = if n > 2 {
            let dof = (n - 2) as f64;
            let slope_se = ((1.0 - r_value * r_value) * syy / sxx / dof).sqrt();
            let mean_x_sq = xs.dot(&xs) / n as f64;
            (Some(slope_se), Some(slope_se * mean_x_sq.sqrt()))
        } else {
            (None, None)
        };

        debug!(
            "OLS over {} samples: Sxx={:e} Syy={:e} Sxy={:e} slope={} intercept={} r={}",
            n, sxx, syy, sxy, slope, intercept, r_value
        );

        Ok(Self {
            slope,
            intercept,
            r_value,
            slope_stderr,
            intercept_stderr,
            n,
        })
    }

    /// Value of the fitted line at `x`
    ///
    /// Evaluated as a plain multiply then add, so recomputing a fitted
    /// value from `slope`, `intercept` and `x` reproduces it bit for bit.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Coefficient of determination `r²`
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }
}

// =================================================================================================
// Tests
// =================================================================================================
