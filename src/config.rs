//! Run configuration
//!
//! Everything a run needs is carried explicitly: the physical constants go
//! to the calculator, the paths and column positions to the input and output
//! collaborators. Defaults reproduce the laboratory setup the tool was
//! written for (PP5 dye on 0.2 g adsorbent in 25 mL).

use std::path::{Component, Path, PathBuf};

use crate::models::FitError;

// =================================================================================================
// Physical Constants
// =================================================================================================

/// Constants converting adsorbed concentration into adsorption capacity
///
/// $$q_e = \frac{C_{ads} \cdot V \cdot M \cdot 1000}{m}$$
///
/// # Fields
///
/// - `molar_mass`: $M$ (g/mol)
/// - `volume`: solution volume $V$ (L)
/// - `mass`: adsorbent mass $m$ (g)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Molar mass of the adsorbate (g/mol)
    pub molar_mass: f64,

    /// Solution volume (L)
    pub volume: f64,

    /// Adsorbent mass (g)
    pub mass: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            molar_mass: 243.29,
            volume: 0.025,
            mass: 0.2,
        }
    }
}

impl PhysicalConstants {
    /// Create validated constants
    ///
    /// # Errors
    ///
    /// [`FitError::InvalidConstant`] if any value is not finite and strictly positive.
    ///
    /// # Example
    ///
    /// ```rust
    /// use langmuir_fit::config::PhysicalConstants;
    ///
    /// let constants = PhysicalConstants::new(243.29, 0.025, 0.2).unwrap();
    /// assert!(PhysicalConstants::new(243.29, -0.025, 0.2).is_err());
    /// ```
    pub fn new(molar_mass: f64, volume: f64, mass: f64) -> Result<Self, FitError> {
        let constants = Self {
            molar_mass,
            volume,
            mass,
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Check every constant is finite and strictly positive
    pub fn validate(&self) -> Result<(), FitError> {
        for (name, value) in [
            ("molar_mass", self.molar_mass),
            ("volume", self.volume),
            ("mass", self.mass),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FitError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }
}

// =================================================================================================
// Fit Configuration
// =================================================================================================

/// Configuration of one fitting run
///
/// # Example
///
/// ```rust
/// use langmuir_fit::config::FitConfig;
///
/// let config = FitConfig::default()
///     .with_input("isotherm.xlsx")
///     .with_sheet("Sheet1")
///     .with_columns(0, 1)
///     .with_preview("isotherm.png");
///
/// assert_eq!(config.ce_column, 0);
/// assert_eq!(config.preview.as_deref(), Some(std::path::Path::new("isotherm.png")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// Spreadsheet holding the measurements (`.xlsx` or `.csv`)
    pub input: PathBuf,

    /// Worksheet name (ignored for CSV input)
    pub sheet: String,

    /// Zero-based column index of the equilibrium concentration C_e
    pub ce_column: usize,

    /// Zero-based column index of the adsorbed concentration
    pub adsorbed_column: usize,

    /// Destination of the linearized data table
    pub csv_output: PathBuf,

    /// Destination of the Veusz project
    pub project_output: PathBuf,

    /// Optional rendered preview (`.png` or `.svg`)
    pub preview: Option<PathBuf>,

    /// Constants for the q_e conversion
    pub constants: PhysicalConstants,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("pp5 data 2025.xlsx"),
            sheet: "Sheet2".to_string(),
            ce_column: 2,
            adsorbed_column: 3,
            csv_output: PathBuf::from("langmuir_data.csv"),
            project_output: PathBuf::from("langmuir_plot.vsz"),
            preview: None,
            constants: PhysicalConstants::default(),
        }
    }
}

impl FitConfig {
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Set the C_e and adsorbed concentration column indices
    pub fn with_columns(mut self, ce_column: usize, adsorbed_column: usize) -> Self {
        self.ce_column = ce_column;
        self.adsorbed_column = adsorbed_column;
        self
    }

    pub fn with_csv_output(mut self, path: impl AsRef<Path>) -> Self {
        self.csv_output = path.as_ref().to_path_buf();
        self
    }

    pub fn with_project_output(mut self, path: impl AsRef<Path>) -> Self {
        self.project_output = path.as_ref().to_path_buf();
        self
    }

    pub fn with_preview(mut self, path: impl AsRef<Path>) -> Self {
        self.preview = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Path under which the project links its data table
    ///
    /// Veusz resolves a relative link against the project's directory, so
    /// the table path is rewritten relative to it: the bare file name when
    /// both share a directory, `../data/table.csv` for sibling directories.
    /// When no relative form can be derived lexically (a `..` in the
    /// project directory, or one path absolute and the other not) the link
    /// is absolute.
    pub fn linked_data_file(&self) -> String {
        let project_dir = self.project_output.parent().unwrap_or(Path::new(""));
        let linked = match relative_to(&self.csv_output, project_dir) {
            Some(relative) => relative,
            None => std::env::current_dir()
                .map(|cwd| cwd.join(&self.csv_output))
                .unwrap_or_else(|_| self.csv_output.clone()),
        };
        linked.to_string_lossy().into_owned()
    }
}

/// `target` expressed relative to `base`, both taken lexically
fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    if target.is_absolute() != base.is_absolute() {
        return None;
    }

    let target: Vec<Component> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let base: Vec<Component> = base
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Climbing out of `..` or across a root/prefix needs the real filesystem
    if base[common..]
        .iter()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let c = PhysicalConstants::default();
        assert_eq!(c.molar_mass, 243.29);
        assert_eq!(c.volume, 0.025);
        assert_eq!(c.mass, 0.2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_constants_reject_non_positive() {
        assert!(matches!(
            PhysicalConstants::new(0.0, 0.025, 0.2),
            Err(FitError::InvalidConstant { name: "molar_mass", .. })
        ));
        assert!(matches!(
            PhysicalConstants::new(243.29, -1.0, 0.2),
            Err(FitError::InvalidConstant { name: "volume", .. })
        ));
        assert!(matches!(
            PhysicalConstants::new(243.29, 0.025, f64::NAN),
            Err(FitError::InvalidConstant { name: "mass", .. })
        ));
    }

    #[test]
    fn test_default_config() {
        let config = FitConfig::default();
        assert_eq!(config.sheet, "Sheet2");
        assert_eq!(config.ce_column, 2);
        assert_eq!(config.adsorbed_column, 3);
        assert_eq!(config.csv_output, PathBuf::from("langmuir_data.csv"));
        assert_eq!(config.project_output, PathBuf::from("langmuir_plot.vsz"));
        assert!(config.preview.is_none());
    }

    #[test]
    fn test_builder() {
        let config = FitConfig::default()
            .with_input("data.csv")
            .with_sheet("Run 3")
            .with_columns(0, 1)
            .with_csv_output("out/table.csv")
            .with_project_output("out/plot.vsz")
            .with_constants(PhysicalConstants::new(100.0, 0.05, 0.1).unwrap());

        assert_eq!(config.input, PathBuf::from("data.csv"));
        assert_eq!(config.sheet, "Run 3");
        assert_eq!((config.ce_column, config.adsorbed_column), (0, 1));
        assert_eq!(config.constants.molar_mass, 100.0);
    }

    #[test]
    fn test_linked_data_file_same_directory() {
        let config = FitConfig::default()
            .with_csv_output("out/table.csv")
            .with_project_output("out/plot.vsz");
        assert_eq!(config.linked_data_file(), "table.csv");

        let config = FitConfig::default();
        assert_eq!(config.linked_data_file(), "langmuir_data.csv");
    }

    #[test]
    fn test_linked_data_file_other_directory() {
        let linked = |csv: &str, project: &str| {
            FitConfig::default()
                .with_csv_output(csv)
                .with_project_output(project)
                .linked_data_file()
        };

        assert_eq!(linked("data/table.csv", "plots/plot.vsz"), "../data/table.csv");
        assert_eq!(linked("table.csv", "plots/plot.vsz"), "../table.csv");
        assert_eq!(linked("data/table.csv", "plot.vsz"), "data/table.csv");
        assert_eq!(linked("out/data/table.csv", "out/plots/v1/plot.vsz"), "../../data/table.csv");
        assert_eq!(linked("./out/table.csv", "out/plot.vsz"), "table.csv");
        assert_eq!(linked("/srv/data/table.csv", "/srv/plots/plot.vsz"), "../data/table.csv");
    }

    #[test]
    fn test_linked_data_file_falls_back_to_absolute() {
        let config = FitConfig::default()
            .with_csv_output("data/table.csv")
            .with_project_output("../plots/plot.vsz");
        let linked = PathBuf::from(config.linked_data_file());
        assert!(linked.is_absolute());
        assert!(linked.ends_with("data/table.csv"));

        let config = FitConfig::default()
            .with_csv_output("/srv/data/table.csv")
            .with_project_output("plots/plot.vsz");
        assert_eq!(config.linked_data_file(), "/srv/data/table.csv");
    }
}
