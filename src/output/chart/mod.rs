//! Chart construction behind a backend-neutral builder
//!
//! The Langmuir chart is always the same recipe: measured points as
//! unconnected markers, the fitted line, two axis labels, a title and the
//! fitted equation written at the top-left data corner. The recipe is
//! expressed once in [`build_langmuir_chart`] against the [`ChartBuilder`]
//! trait; backends only decide how the result is stored.
//!
//! | Backend            | Output                           |
//! |--------------------|----------------------------------|
//! | [`VeuszProject`]   | `.vsz` project linked to the CSV |
//! | [`PlottedChart`]   | `.png` / `.svg` image (plotters) |
//!
//! # Example
//!
//! ```rust,ignore
//! use langmuir_fit::output::chart::{build_langmuir_chart, ChartBuilder, VeuszProject};
//!
//! let mut project = VeuszProject::new("langmuir_data.csv");
//! build_langmuir_chart(&mut project, &fit);
//! project.export(Path::new("langmuir_plot.vsz"))?;
//! ```

pub mod plot;
pub mod veusz;

pub use plot::{PlotConfig, PlottedChart};
pub use veusz::VeuszProject;

use std::path::Path;

use plotters::style::RGBColor;

use crate::models::LangmuirFit;
use crate::output::ExportError;

// =================================================================================================
// Chart Elements
// =================================================================================================

/// Marker shapes available to every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Cross,
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Unconnected markers, no line
    Markers { shape: MarkerShape, color: RGBColor },

    /// Connected line, no markers
    Line { color: RGBColor, width_pt: f64 },
}

/// One plotted series
///
/// Carries both the column names of the linked data table (for backends that
/// reference the table) and the values (for backends that draw directly).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Series name, also used as legend entry
    pub name: String,

    /// Column of the data table holding `x`
    pub x_column: String,

    /// Column of the data table holding `y`
    pub y_column: String,

    pub x: Vec<f64>,
    pub y: Vec<f64>,

    pub style: SeriesStyle,
}

/// Text labels a chart carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelTarget {
    Title,
    XAxis,
    YAxis,
}

/// Free text placed at data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Text, may span several lines
    pub text: String,

    /// Anchor in data coordinates
    pub x: f64,
    pub y: f64,

    /// Font size in points
    pub size_pt: f64,
}

// =================================================================================================
// Builder Trait
// =================================================================================================

/// Imperative chart construction, independent of the charting backend
pub trait ChartBuilder {
    /// Append a series; series are drawn in insertion order
    fn add_series(&mut self, series: Series);

    /// Set (or replace) the title or an axis label
    fn set_label(&mut self, target: LabelTarget, text: &str);

    /// Place a text annotation
    fn annotate(&mut self, annotation: Annotation);

    /// Write the chart to `path`
    fn export(&self, path: &Path) -> Result<(), ExportError>;
}

// =================================================================================================
// Langmuir Chart Recipe
// =================================================================================================

pub const CHART_TITLE: &str = "Langmuir Isotherm (Linearized)";
pub const X_AXIS_LABEL: &str = "1 / Ce (L/mol)";
pub const Y_AXIS_LABEL: &str = "1 / qe (g/mg)";

/// Font size of the equation annotation (pt)
pub const ANNOTATION_SIZE_PT: f64 = 12.0;

/// Data table column names, as written by the default CSV export
pub const DEFAULT_COLUMNS: [&str; 3] = ["inv_Ce", "inv_qe", "fit_qe"];

/// Build the linearized Langmuir chart on any backend
///
/// Uses the default table column names (`inv_Ce`, `inv_qe`, `fit_qe`).
pub fn build_langmuir_chart<B: ChartBuilder + ?Sized>(builder: &mut B, fit: &LangmuirFit) {
    build_langmuir_chart_with_columns(builder, fit, DEFAULT_COLUMNS);
}

/// Build the linearized Langmuir chart referencing custom table columns
///
/// `columns` are the `1/C_e`, `1/q_e` and fitted column names in that order.
pub fn build_langmuir_chart_with_columns<B: ChartBuilder + ?Sized>(
    builder: &mut B,
    fit: &LangmuirFit,
    columns: [&str; 3],
) {
    let [x_column, y_column, fit_column] = columns;

    builder.add_series(Series {
        name: "data".to_string(),
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        x: fit.inv_ce.clone(),
        y: fit.inv_qe.clone(),
        style: SeriesStyle::Markers {
            shape: MarkerShape::Circle,
            color: plotters::style::BLACK,
        },
    });

    builder.add_series(Series {
        name: "fit".to_string(),
        x_column: x_column.to_string(),
        y_column: fit_column.to_string(),
        x: fit.inv_ce.clone(),
        y: fit.fitted.clone(),
        style: SeriesStyle::Line {
            color: plotters::style::RED,
            width_pt: 1.5,
        },
    });

    builder.set_label(LabelTarget::XAxis, X_AXIS_LABEL);
    builder.set_label(LabelTarget::YAxis, Y_AXIS_LABEL);
    builder.set_label(LabelTarget::Title, CHART_TITLE);

    let (x, y) = fit.annotation_anchor();
    builder.annotate(Annotation {
        text: fit.equation_label(),
        x,
        y,
        size_pt: ANNOTATION_SIZE_PT,
    });
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicalConstants;
    use crate::models::compute_langmuir_fit;
    use std::collections::HashMap;

    /// Records every builder call
    #[derive(Default)]
    struct RecordingBuilder {
        series: Vec<Series>,
        labels: HashMap<LabelTarget, String>,
        annotations: Vec<Annotation>,
    }

    impl ChartBuilder for RecordingBuilder {
        fn add_series(&mut self, series: Series) {
            self.series.push(series);
        }

        fn set_label(&mut self, target: LabelTarget, text: &str) {
            self.labels.insert(target, text.to_string());
        }

        fn annotate(&mut self, annotation: Annotation) {
            self.annotations.push(annotation);
        }

        fn export(&self, _path: &Path) -> Result<(), ExportError> {
            Ok(())
        }
    }

    fn sample_fit() -> LangmuirFit {
        compute_langmuir_fit(
            &[0.1, 0.2, 0.5, 0.9],
            &[0.01, 0.015, 0.02, 0.021],
            &PhysicalConstants::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_recipe_series() {
        let fit = sample_fit();
        let mut builder = RecordingBuilder::default();
        build_langmuir_chart(&mut builder, &fit);

        assert_eq!(builder.series.len(), 2);

        let data = &builder.series[0];
        assert_eq!(data.name, "data");
        assert_eq!((data.x_column.as_str(), data.y_column.as_str()), ("inv_Ce", "inv_qe"));
        assert_eq!(data.y, fit.inv_qe);
        assert!(matches!(data.style, SeriesStyle::Markers { shape: MarkerShape::Circle, .. }));

        let line = &builder.series[1];
        assert_eq!(line.name, "fit");
        assert_eq!(line.y_column, "fit_qe");
        assert_eq!(line.y, fit.fitted);
        assert!(matches!(line.style, SeriesStyle::Line { width_pt, .. } if width_pt == 1.5));
    }

    #[test]
    fn test_recipe_labels() {
        let fit = sample_fit();
        let mut builder = RecordingBuilder::default();
        build_langmuir_chart(&mut builder, &fit);

        assert_eq!(builder.labels[&LabelTarget::XAxis], "1 / Ce (L/mol)");
        assert_eq!(builder.labels[&LabelTarget::YAxis], "1 / qe (g/mg)");
        assert_eq!(builder.labels[&LabelTarget::Title], "Langmuir Isotherm (Linearized)");
    }

    #[test]
    fn test_recipe_annotation() {
        let fit = sample_fit();
        let mut builder = RecordingBuilder::default();
        build_langmuir_chart(&mut builder, &fit);

        assert_eq!(builder.annotations.len(), 1);
        let note = &builder.annotations[0];
        assert_eq!(note.text, fit.equation_label());
        assert_eq!(note.x, 1.0 / 0.9);
        assert_eq!(note.y, fit.inv_qe.iter().copied().fold(f64::MIN, f64::max));
        assert_eq!(note.size_pt, 12.0);
    }

    #[test]
    fn test_custom_columns() {
        let fit = sample_fit();
        let mut builder = RecordingBuilder::default();
        build_langmuir_chart_with_columns(&mut builder, &fit, ["x", "y", "yfit"]);

        assert_eq!(builder.series[0].x_column, "x");
        assert_eq!(builder.series[1].y_column, "yfit");
    }
}
