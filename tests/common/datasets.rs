//! Synthetic isotherm datasets

use langmuir_fit::config::PhysicalConstants;

/// Constants for which `q_e = C_adsorbed` (V = 1 L, M = 1 g/mol, m = 1000 g)
pub fn unit_constants() -> PhysicalConstants {
    PhysicalConstants::new(1.0, 1.0, 1000.0).unwrap()
}

/// Measurements generated from known isotherm constants
#[derive(Debug, Clone)]
pub struct LangmuirDataset {
    pub q_m: f64,
    pub k_l: f64,
    pub c_e: Vec<f64>,
    pub c_adsorbed: Vec<f64>,
}

/// Exact Langmuir data for `unit_constants()`
///
/// `q_e = q_m · K_L · C_e / (1 + K_L · C_e)` at every `C_e`.
pub fn langmuir_dataset(q_m: f64, k_l: f64, c_e: &[f64]) -> LangmuirDataset {
    let c_adsorbed = c_e
        .iter()
        .map(|&c| q_m * k_l * c / (1.0 + k_l * c))
        .collect();

    LangmuirDataset {
        q_m,
        k_l,
        c_e: c_e.to_vec(),
        c_adsorbed,
    }
}

/// Relative error `|a - b| / |b|`
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-15 {
        actual.abs()
    } else {
        ((actual - expected) / expected).abs()
    }
}
