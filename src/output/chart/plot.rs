//! Static image backend (plotters)
//!
//! Renders the chart directly to a `.png` or `.svg` file, picked from the
//! output extension. Used for the quick-look preview next to the Veusz
//! project.

use std::error::Error;
use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, ChartBuilder as PlottersChart, Circle, Color, Cross, DrawingArea,
    DrawingBackend, EmptyElement, IntoDrawingArea, IntoFont, LineSeries, PathElement, RGBColor,
    Rectangle, SVGBackend, ShapeStyle, Text, BLACK, WHITE,
};

use super::{Annotation, ChartBuilder, LabelTarget, MarkerShape, Series, SeriesStyle};
use crate::output::ExportError;

/// Pixels per typographic point at 96 dpi
const PX_PER_PT: f64 = 96.0 / 72.0;

/// Configuration for the rendered image
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    pub xlabel: String,
    pub ylabel: String,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Marker radius in pixels (default: 5)
    pub marker_size: u32,

    /// Draw the series legend (default: true)
    pub show_legend: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(),
            ylabel: String::new(),
            background: WHITE,
            show_grid: true,
            marker_size: 5,
            show_legend: true,
        }
    }
}

impl PlotConfig {
    /// Config preset for the linearized Langmuir chart
    pub fn linearized() -> Self {
        Self {
            title: super::CHART_TITLE.to_string(),
            xlabel: super::X_AXIS_LABEL.to_string(),
            ylabel: super::Y_AXIS_LABEL.to_string(),
            ..Self::default()
        }
    }

    /// Builder pattern: set image size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Chart rendered to an image file
#[derive(Debug, Clone)]
pub struct PlottedChart {
    config: PlotConfig,
    series: Vec<Series>,
    annotations: Vec<Annotation>,
}

impl PlottedChart {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            series: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Data bounds over every series and annotation anchor, padded
    fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let xs = self
            .series
            .iter()
            .flat_map(|s| s.x.iter().copied())
            .chain(self.annotations.iter().map(|a| a.x));
        let ys = self
            .series
            .iter()
            .flat_map(|s| s.y.iter().copied())
            .chain(self.annotations.iter().map(|a| a.y));

        Some((padded_range(xs, 0.05)?, padded_range(ys, 0.10)?))
    }
}

impl Default for PlottedChart {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

impl ChartBuilder for PlottedChart {
    fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    fn set_label(&mut self, target: LabelTarget, text: &str) {
        let slot = match target {
            LabelTarget::Title => &mut self.config.title,
            LabelTarget::XAxis => &mut self.config.xlabel,
            LabelTarget::YAxis => &mut self.config.ylabel,
        };
        *slot = text.to_string();
    }

    fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    fn export(&self, path: &Path) -> Result<(), ExportError> {
        let (x_range, y_range) = self
            .bounds()
            .ok_or_else(|| ExportError::EmptyData("chart has no finite points".into()))?;

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_else(|| "png".to_string());

        let size = (self.config.width, self.config.height);
        let result = match ext.as_str() {
            "svg" => render_impl(SVGBackend::new(path, size).into_drawing_area(), self, x_range, y_range),
            _ => render_impl(BitMapBackend::new(path, size).into_drawing_area(), self, x_range, y_range),
        };
        result.map_err(|e| ExportError::Plot(e.to_string()))?;

        info!("Wrote chart image {}", path.display());
        Ok(())
    }
}

// =================================================================================================
// Private Plot Implementation
// =================================================================================================

/// `(min - pad, max + pad)` of the finite values, `None` if there are none
fn padded_range(values: impl Iterator<Item = f64>, fraction: f64) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let span = hi - lo;
    let pad = if span > 0.0 {
        span * fraction
    } else if lo != 0.0 {
        lo.abs() * fraction
    } else {
        1.0
    };
    Some((lo - pad, hi + pad))
}

fn tick_label(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e4).contains(&a) {
        format!("{:.2e}", v)
    } else {
        format!("{:.3}", v)
    }
}

fn pt_to_px(pt: f64) -> u32 {
    (pt * PX_PER_PT).round().max(1.0) as u32
}

fn render_impl<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart_def: &PlottedChart,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let config = &chart_def.config;
    root.fill(&config.background)?;

    let mut chart = PlottersChart::on(&root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    let mut mesh = chart.configure_mesh();
    if !config.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .x_label_formatter(&|x| tick_label(*x))
        .y_label_formatter(&|y| tick_label(*y))
        .draw()?;

    let r = config.marker_size as i32;

    for series in &chart_def.series {
        let points: Vec<(f64, f64)> = series
            .x
            .iter()
            .zip(series.y.iter())
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        match series.style {
            SeriesStyle::Markers { shape, color } => {
                let style = ShapeStyle::from(&color).filled();
                let anno = match shape {
                    MarkerShape::Circle => chart.draw_series(
                        points.iter().map(|p| Circle::new(*p, r, style)),
                    )?,
                    MarkerShape::Square => {
                        let s = r;
                        chart.draw_series(points.iter().map(|p| {
                            EmptyElement::at(*p) + Rectangle::new([(-s, -s), (s, s)], style)
                        }))?
                    }
                    MarkerShape::Cross => chart.draw_series(
                        points
                            .iter()
                            .map(|p| Cross::new(*p, r, ShapeStyle::from(&color).stroke_width(2))),
                    )?,
                };
                anno.label(series.name.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 4, style));
            }
            SeriesStyle::Line { color, width_pt } => {
                let style = ShapeStyle::from(&color).stroke_width(pt_to_px(width_pt));
                chart
                    .draw_series(LineSeries::new(points.into_iter(), style))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
    }

    for note in &chart_def.annotations {
        let font_px = pt_to_px(note.size_pt);
        let line_height = (font_px as f64 * 1.3).round() as i32;
        let font = ("sans-serif", font_px).into_font();
        chart.draw_series(note.text.lines().enumerate().map(|(i, line)| {
            EmptyElement::at((note.x, note.y))
                + Text::new(line.to_string(), (8, 4 + i as i32 * line_height), font.clone())
        }))?;
    }

    if config.show_legend && !chart_def.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&config.background.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
