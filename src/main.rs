//! langmuir-fit CLI - linearized Langmuir isotherm from a measurement sheet

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use langmuir_fit::config::{FitConfig, PhysicalConstants};

#[derive(Parser)]
#[command(name = "langmuir-fit")]
#[command(
    author,
    version,
    about = "Fit adsorption data to the linearized Langmuir isotherm"
)]
struct Cli {
    /// Measurement spreadsheet (xlsx or csv)
    #[arg(short, long, default_value = "pp5 data 2025.xlsx")]
    input: PathBuf,

    /// Worksheet name (xlsx only)
    #[arg(short, long, default_value = "Sheet2")]
    sheet: String,

    /// Column of the equilibrium concentration C_e (0-based)
    #[arg(long, default_value = "2")]
    ce_column: usize,

    /// Column of the adsorbed concentration (0-based)
    #[arg(long, default_value = "3")]
    adsorbed_column: usize,

    /// Output CSV table
    #[arg(long, default_value = "langmuir_data.csv")]
    csv: PathBuf,

    /// Output Veusz project
    #[arg(short, long, default_value = "langmuir_plot.vsz")]
    project: PathBuf,

    /// Also render the chart to an image (png or svg)
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Molar mass of the adsorbate (g/mol)
    #[arg(long, default_value = "243.29")]
    molar_mass: f64,

    /// Solution volume (L)
    #[arg(long, default_value = "0.025")]
    volume: f64,

    /// Adsorbent mass (g)
    #[arg(long, default_value = "0.2")]
    mass: f64,
}

impl Cli {
    fn into_config(self) -> Result<FitConfig> {
        let constants = PhysicalConstants::new(self.molar_mass, self.volume, self.mass)
            .context("invalid physical constants")?;

        let mut config = FitConfig::default()
            .with_input(&self.input)
            .with_sheet(self.sheet)
            .with_columns(self.ce_column, self.adsorbed_column)
            .with_csv_output(&self.csv)
            .with_project_output(&self.project)
            .with_constants(constants);
        if let Some(preview) = &self.preview {
            config = config.with_preview(preview);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().into_config()?;
    let fit = langmuir_fit::run(&config)
        .with_context(|| format!("failed to fit {}", config.input.display()))?;

    println!(
        "Langmuir plot saved as Veusz project: {}",
        config.project_output.display()
    );
    if let Some(preview) = &config.preview {
        println!("Preview image saved: {}", preview.display());
    }
    println!("{}", fit.summary());

    Ok(())
}
