//! Veusz project backend
//!
//! A `.vsz` file is a Veusz command script: it links the data file and then
//! builds the widget tree with `Add`/`To`/`Set` commands. Opening the
//! project in Veusz re-reads the linked CSV, so the chart follows the table.
//!
//! Widget tree written for a chart:
//!
//! ```text
//! page1
//! └── graph (name from config, default "langmuir")
//!     ├── x, y            axes with their labels
//!     ├── <series...>     one `xy` widget per series
//!     ├── title           `label` widget, relative position above the plot
//!     └── annotation      `label` widget at data coordinates
//! ```

use std::fs;
use std::path::Path;

use log::info;
use plotters::style::RGBColor;

use super::{Annotation, ChartBuilder, LabelTarget, MarkerShape, Series, SeriesStyle};
use crate::output::ExportError;

/// Chart held as a Veusz project
#[derive(Debug, Clone, PartialEq)]
pub struct VeuszProject {
    data_file: String,
    graph_name: String,
    series: Vec<Series>,
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    annotations: Vec<Annotation>,
}

impl VeuszProject {
    /// Empty project linked to the CSV table `data_file`
    ///
    /// `data_file` is written verbatim; Veusz resolves a relative path
    /// against the project's directory.
    pub fn new(data_file: impl Into<String>) -> Self {
        Self {
            data_file: data_file.into(),
            graph_name: "langmuir".to_string(),
            series: Vec::new(),
            title: None,
            x_label: None,
            y_label: None,
            annotations: Vec::new(),
        }
    }

    /// Builder pattern: set the graph widget name
    pub fn graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    /// Render the project script
    pub fn render(&self) -> String {
        let mut script = Script::default();

        script.comment(&format!(
            "Veusz saved document (version 3.6)\n# Saved at {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f")
        ));
        script.blank();

        script.line(&format!(
            "ImportFileCSV({}, linked=True)",
            py_str(&self.data_file)
        ));
        script.add("page", "page1");
        script.to("page1");
        script.add("graph", &self.graph_name);
        script.to(&self.graph_name);

        script.add("axis", "x");
        script.to("x");
        if let Some(label) = &self.x_label {
            script.set("label", &py_str(label));
        }
        script.up();

        script.add("axis", "y");
        script.to("y");
        if let Some(label) = &self.y_label {
            script.set("label", &py_str(label));
        }
        script.set("direction", &py_str("vertical"));
        script.up();

        for series in &self.series {
            script.add("xy", &series.name);
            script.to(&series.name);
            script.set("xData", &py_str(&series.x_column));
            script.set("yData", &py_str(&series.y_column));
            match series.style {
                SeriesStyle::Markers { shape, color } => {
                    script.set("marker", &py_str(marker_name(shape)));
                    script.set("MarkerFill/color", &py_str(&color_name(color)));
                    script.set("PlotLine/hide", "True");
                }
                SeriesStyle::Line { color, width_pt } => {
                    script.set("marker", &py_str("none"));
                    script.set("PlotLine/color", &py_str(&color_name(color)));
                    script.set("PlotLine/width", &py_str(&format!("{}pt", width_pt)));
                }
            }
            script.up();
        }

        if let Some(title) = &self.title {
            script.add("label", "title");
            script.to("title");
            script.set("label", &py_str(title));
            script.set("xPos", "[0.5]");
            script.set("yPos", "[1.02]");
            script.set("alignHorz", &py_str("centre"));
            script.set("alignVert", &py_str("bottom"));
            script.set("Text/size", &py_str("14pt"));
            script.up();
        }

        for (i, note) in self.annotations.iter().enumerate() {
            let name = if i == 0 {
                "annotation".to_string()
            } else {
                format!("annotation{}", i + 1)
            };
            script.add("label", &name);
            script.to(&name);
            script.set("label", &py_str(&note.text));
            script.set("positioning", &py_str("axes"));
            script.set("xPos", &format!("[{:?}]", note.x));
            script.set("yPos", &format!("[{:?}]", note.y));
            script.set("alignVert", &py_str("top"));
            script.set("Text/size", &py_str(&format!("{}pt", note.size_pt)));
            script.up();
        }

        script.up();
        script.up();

        script.finish()
    }
}

impl ChartBuilder for VeuszProject {
    fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    fn set_label(&mut self, target: LabelTarget, text: &str) {
        let slot = match target {
            LabelTarget::Title => &mut self.title,
            LabelTarget::XAxis => &mut self.x_label,
            LabelTarget::YAxis => &mut self.y_label,
        };
        *slot = Some(text.to_string());
    }

    fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    fn export(&self, path: &Path) -> Result<(), ExportError> {
        if self.series.is_empty() {
            return Err(ExportError::EmptyData("chart has no series".into()));
        }
        fs::write(path, self.render())?;
        info!("Wrote Veusz project {} (data: {})", path.display(), self.data_file);
        Ok(())
    }
}

// =================================================================================================
// Script Helpers
// =================================================================================================

/// Accumulates Veusz commands
#[derive(Default)]
struct Script {
    out: String,
}

impl Script {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn comment(&mut self, text: &str) {
        self.line(&format!("# {}", text));
    }

    fn add(&mut self, widget: &str, name: &str) {
        self.line(&format!(
            "Add({}, name={}, autoadd=False)",
            py_str(widget),
            py_str(name)
        ));
    }

    fn to(&mut self, name: &str) {
        self.line(&format!("To({})", py_str(name)));
    }

    fn up(&mut self) {
        self.to("..");
    }

    /// `value` must already be a Python literal
    fn set(&mut self, setting: &str, value: &str) {
        self.line(&format!("Set({}, {})", py_str(setting), value));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Single-quoted Python string literal
fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn marker_name(shape: MarkerShape) -> &'static str {
    match shape {
        MarkerShape::Circle => "circle",
        MarkerShape::Square => "square",
        MarkerShape::Cross => "cross",
    }
}

/// Veusz color name for basic colors, `#rrggbb` otherwise
fn color_name(color: RGBColor) -> String {
    match (color.0, color.1, color.2) {
        (0, 0, 0) => "black".to_string(),
        (255, 0, 0) => "red".to_string(),
        (0, 255, 0) => "green".to_string(),
        (0, 0, 255) => "blue".to_string(),
        (255, 255, 255) => "white".to_string(),
        (r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
