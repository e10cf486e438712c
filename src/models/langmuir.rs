//! Linearized Langmuir isotherm fit
//!
//! The Langmuir isotherm relates the equilibrium concentration $C_e$ to the
//! adsorbed amount per unit adsorbent mass $q_e$:
//!
//! $$q_e = \frac{q_m K_L C_e}{1 + K_L C_e}$$
//!
//! Taking reciprocals on both sides gives a straight line in $(1/C_e, 1/q_e)$:
//!
//! $$\frac{1}{q_e} = \frac{1}{K_L q_m} \cdot \frac{1}{C_e} + \frac{1}{q_m}$$
//!
//! so an ordinary least-squares fit of $1/q_e$ against $1/C_e$ yields the
//! isotherm constants from its slope $m$ and intercept $b$:
//!
//! - $q_m = 1/b$ (monolayer capacity, mg/g)
//! - $K_L = m/b$
//! - $R^2 = r^2$
//!
//! # Pipeline
//!
//! ```text
//! (C_e, C_adsorbed) ──truncate──► SampleSet
//!        │
//!        ▼
//! q_e = C_adsorbed · V · M · 1000 / m
//!        │
//!        ▼
//! (x, y) = (1/C_e, 1/q_e) ──OLS──► (slope, intercept, r)
//!        │
//!        ▼
//! q_m, K_L, R², fitted_y = slope·x + intercept
//! ```
//!
//! # Example
//!
//! ```rust
//! use langmuir_fit::config::PhysicalConstants;
//! use langmuir_fit::models::compute_langmuir_fit;
//!
//! let constants = PhysicalConstants::new(243.29, 0.025, 0.2).unwrap();
//! let fit = compute_langmuir_fit(
//!     &[0.1, 0.2, 0.5],
//!     &[0.01, 0.015, 0.02],
//!     &constants,
//! ).unwrap();
//!
//! assert_eq!(fit.len(), 3);
//! assert!(fit.r_squared >= 0.0 && fit.r_squared <= 1.0);
//! ```

use std::fmt;

use log::warn;
use thiserror::Error;

use super::regression::LinearRegression;
use crate::config::PhysicalConstants;

// =================================================================================================
// Errors
// =================================================================================================

/// Measured or derived quantity involved in a domain error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Equilibrium concentration $C_e$ (mol/L)
    EquilibriumConcentration,
    /// Adsorbed concentration (mol/L)
    AdsorbedConcentration,
    /// Adsorption capacity $q_e$ (mg/g)
    AdsorptionCapacity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::EquilibriumConcentration => write!(f, "equilibrium concentration C_e"),
            Quantity::AdsorbedConcentration => write!(f, "adsorbed concentration"),
            Quantity::AdsorptionCapacity => write!(f, "adsorption capacity q_e"),
        }
    }
}

/// Errors raised by the isotherm calculation
///
/// Every variant is fatal: no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// No paired sample survived truncation
    #[error("empty input: at least one paired sample is required")]
    EmptyInput,

    /// Regression inputs of different lengths
    #[error("length mismatch: {x} abscissae versus {y} ordinates")]
    LengthMismatch { x: usize, y: usize },

    /// A physical constant is zero, negative or not finite
    #[error("invalid constant: {name} must be finite and strictly positive, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    /// Reciprocal of a zero sample value
    #[error("division by zero: {quantity} is zero at sample {index}")]
    ZeroDenominator { quantity: Quantity, index: usize },

    /// Fitted intercept is exactly zero, so `q_m = 1/b` is undefined
    #[error("division by zero: fitted intercept is zero, q_m and K_L are undefined")]
    ZeroIntercept,

    /// Every `1/C_e` is identical, so the slope has a zero denominator
    #[error("division by zero: all 1/C_e values are identical, slope is undefined")]
    DegenerateAbscissa,

    /// NaN or infinity in the samples or their reciprocals
    #[error("invalid data: {quantity} is not finite at sample {index}")]
    NonFinite { quantity: Quantity, index: usize },
}

// =================================================================================================
// Sample Set
// =================================================================================================

/// Paired `(C_e, C_adsorbed)` measurements
///
/// Built from two raw columns that may be ragged: both are cut to the
/// length of the shorter one and trailing unmatched entries are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    c_e: Vec<f64>,
    c_adsorbed: Vec<f64>,
    dropped: usize,
}

impl SampleSet {
    /// Pair two columns, truncating to `min(c_e.len(), c_adsorbed.len())`
    ///
    /// Truncation is silent for the result but logged as a warning, since a
    /// ragged sheet usually means a missing or misplaced measurement.
    pub fn new(c_e: &[f64], c_adsorbed: &[f64]) -> Self {
        let n = c_e.len().min(c_adsorbed.len());
        let dropped = c_e.len().max(c_adsorbed.len()) - n;

        if dropped > 0 {
            warn!(
                "Column length mismatch: {} C_e values versus {} C_adsorbed values, \
                 dropping {} trailing unmatched row(s)",
                c_e.len(),
                c_adsorbed.len(),
                dropped
            );
        }

        Self {
            c_e: c_e[..n].to_vec(),
            c_adsorbed: c_adsorbed[..n].to_vec(),
            dropped,
        }
    }

    /// Number of paired samples
    pub fn len(&self) -> usize {
        self.c_e.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c_e.is_empty()
    }

    /// Equilibrium concentrations (mol/L)
    pub fn c_e(&self) -> &[f64] {
        &self.c_e
    }

    /// Adsorbed concentrations (mol/L)
    pub fn c_adsorbed(&self) -> &[f64] {
        &self.c_adsorbed
    }

    /// Number of trailing entries discarded from the longer column
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Iterate over `(C_e, C_adsorbed)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.c_e.iter().copied().zip(self.c_adsorbed.iter().copied())
    }
}

// =================================================================================================
// Fit Result
// =================================================================================================

/// Parameters and curve of a linearized Langmuir fit
///
/// All per-sample vectors share the input ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct LangmuirFit {
    /// Adsorption capacity per sample (mg/g)
    pub q_e: Vec<f64>,

    /// Abscissa of the linearized model, `1/C_e` (L/mol)
    pub inv_ce: Vec<f64>,

    /// Ordinate of the linearized model, `1/q_e` (g/mg)
    pub inv_qe: Vec<f64>,

    /// Fitted line evaluated at each `1/C_e`
    pub fitted: Vec<f64>,

    /// Underlying least-squares line
    pub regression: LinearRegression,

    /// Monolayer capacity `q_m = 1/intercept` (mg/g)
    pub q_m: f64,

    /// Langmuir constant `K_L = slope/intercept`
    pub k_l: f64,

    /// Coefficient of determination `r²`
    pub r_squared: f64,
}

impl LangmuirFit {
    pub fn slope(&self) -> f64 {
        self.regression.slope
    }

    pub fn intercept(&self) -> f64 {
        self.regression.intercept
    }

    /// Number of samples in the fit
    pub fn len(&self) -> usize {
        self.inv_ce.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inv_ce.is_empty()
    }

    /// Equation and R² label drawn on the chart
    ///
    /// The format is fixed: `1/qe = {slope:.4}(1/Ce) + {intercept:.4}` then a
    /// newline and `R² = {r²:.4}`.
    pub fn equation_label(&self) -> String {
        format!(
            "1/qe = {:.4}(1/Ce) + {:.4}\nR² = {:.4}",
            self.slope(),
            self.intercept(),
            self.r_squared
        )
    }

    /// Chart position of the equation label: `(min 1/C_e, max 1/q_e)`
    pub fn annotation_anchor(&self) -> (f64, f64) {
        let x = self.inv_ce.iter().copied().fold(f64::INFINITY, f64::min);
        let y = self.inv_qe.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (x, y)
    }

    /// Human-readable summary of the isotherm constants
    pub fn summary(&self) -> FitSummary {
        FitSummary {
            q_m: self.q_m,
            k_l: self.k_l,
            r_squared: self.r_squared,
        }
    }
}

/// Three-line report printed at the end of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub q_m: f64,
    pub k_l: f64,
    pub r_squared: f64,
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "→ Monolayer capacity (q_m): {:.2} mg/g", self.q_m)?;
        writeln!(f, "→ Langmuir constant (K_L): {:.2} L/mg", self.k_l)?;
        write!(f, "→ R² (fit quality): {:.4}", self.r_squared)
    }
}

// =================================================================================================
// Calculator
// =================================================================================================

/// Fit the linearized Langmuir isotherm to two measured columns
///
/// # Arguments
///
/// * `c_e` - Equilibrium concentrations (mol/L), must be non-zero
/// * `c_adsorbed` - Adsorbed concentrations (mol/L)
/// * `constants` - Molar mass, solution volume and adsorbent mass
///
/// Columns of different lengths are truncated to the shorter one
/// (see [`SampleSet::new`]).
///
/// # Errors
///
/// - [`FitError::InvalidConstant`] for a non-positive or non-finite constant
/// - [`FitError::EmptyInput`] if no paired sample remains
/// - [`FitError::NonFinite`] for NaN/infinite samples or reciprocals
/// - [`FitError::ZeroDenominator`] for a zero `C_e` or a zero `q_e`
/// - [`FitError::DegenerateAbscissa`] if all `1/C_e` coincide
/// - [`FitError::ZeroIntercept`] if the fitted intercept is exactly zero
pub fn compute_langmuir_fit(
    c_e: &[f64],
    c_adsorbed: &[f64],
    constants: &PhysicalConstants,
) -> Result<LangmuirFit, FitError> {
    let samples = SampleSet::new(c_e, c_adsorbed);
    fit_samples(&samples, constants)
}

/// Fit an already paired [`SampleSet`]
pub fn fit_samples(
    samples: &SampleSet,
    constants: &PhysicalConstants,
) -> Result<LangmuirFit, FitError> {
    constants.validate()?;

    if samples.is_empty() {
        return Err(FitError::EmptyInput);
    }

    let n = samples.len();
    let mut q_e = Vec::with_capacity(n);
    let mut inv_ce = Vec::with_capacity(n);
    let mut inv_qe = Vec::with_capacity(n);

    for (index, (ce, cads)) in samples.iter().enumerate() {
        if !ce.is_finite() {
            return Err(FitError::NonFinite {
                quantity: Quantity::EquilibriumConcentration,
                index,
            });
        }
        if !cads.is_finite() {
            return Err(FitError::NonFinite {
                quantity: Quantity::AdsorbedConcentration,
                index,
            });
        }
        if ce == 0.0 {
            return Err(FitError::ZeroDenominator {
                quantity: Quantity::EquilibriumConcentration,
                index,
            });
        }

        let q = cads * constants.volume * constants.molar_mass * 1000.0 / constants.mass;
        if q == 0.0 {
            return Err(FitError::ZeroDenominator {
                quantity: Quantity::AdsorptionCapacity,
                index,
            });
        }

        let x = 1.0 / ce;
        let y = 1.0 / q;
        if !x.is_finite() {
            return Err(FitError::NonFinite {
                quantity: Quantity::EquilibriumConcentration,
                index,
            });
        }
        if !q.is_finite() || !y.is_finite() {
            return Err(FitError::NonFinite {
                quantity: Quantity::AdsorptionCapacity,
                index,
            });
        }

        q_e.push(q);
        inv_ce.push(x);
        inv_qe.push(y);
    }

    let regression = LinearRegression::fit(&inv_ce, &inv_qe)?;

    if regression.intercept == 0.0 {
        return Err(FitError::ZeroIntercept);
    }

    let q_m = 1.0 / regression.intercept;
    let k_l = regression.slope / regression.intercept;
    let r_squared = regression.r_squared();

    let fitted = inv_ce.iter().map(|&x| regression.predict(x)).collect();

    Ok(LangmuirFit {
        q_e,
        inv_ce,
        inv_qe,
        fitted,
        regression,
        q_m,
        k_l,
        r_squared,
    })
}

// =================================================================================================
// Tests
// =================================================================================================
