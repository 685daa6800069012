//! SVG chart rendering
//!
//! Scatter and line series rendered as a self-contained SVG document:
//! standalone via --chart, or inlined into the HTML report. Every point
//! carries a `<title>` child, which browsers surface as a hover tooltip.

use crate::analysis::{AnalysisReport, StudyKind};
use crate::boxcox::inverse_value;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 560.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Points,
    Line,
}

/// One datum with an optional hover tooltip
#[derive(Debug, Clone)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub tooltip: Option<String>,
}

/// A named series with a fixed color
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub kind: SeriesKind,
    pub points: Vec<DataPoint>,
}

/// Scatter/line chart assembled series by series
#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    series: Vec<Series>,
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

impl ScatterChart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Data range across all series, padded 5% on each side
    fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for series in &self.series {
            for point in &series.points {
                x_min = x_min.min(point.x);
                x_max = x_max.max(point.x);
                y_min = y_min.min(point.y);
                y_max = y_max.max(point.y);
            }
        }

        if !x_min.is_finite() {
            return ((0.0, 1.0), (0.0, 1.0));
        }

        let pad = |min: f64, max: f64| {
            let span = (max - min).abs().max(1e-9);
            (min - 0.05 * span, max + 0.05 * span)
        };
        (pad(x_min, x_max), pad(y_min, y_max))
    }

    /// Render the SVG document
    pub fn to_svg(&self) -> String {
        let ((x_min, x_max), (y_min, y_max)) = self.ranges();
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + (1.0 - (y - y_min) / (y_max - y_min)) * plot_h;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" font-family="sans-serif">"#,
            WIDTH, HEIGHT
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <rect width="{}" height="{}" fill="white"/>"#,
            WIDTH, HEIGHT
        ));
        svg.push('\n');

        // Title
        svg.push_str(&format!(
            r##"  <text x="{}" y="28" text-anchor="middle" font-size="18" fill="#333">{}</text>"##,
            WIDTH / 2.0,
            escape_xml(&self.title)
        ));
        svg.push('\n');

        // Gridlines and ticks (6 divisions each axis)
        for i in 0..=5 {
            let fx = x_min + (x_max - x_min) * f64::from(i) / 5.0;
            let fy = y_min + (y_max - y_min) * f64::from(i) / 5.0;
            let px = sx(fx);
            let py = sy(fy);

            svg.push_str(&format!(
                r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="lightgray" stroke-width="1"/>"#,
                px,
                MARGIN_TOP,
                px,
                MARGIN_TOP + plot_h
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="lightgray" stroke-width="1"/>"#,
                MARGIN_LEFT,
                py,
                MARGIN_LEFT + plot_w,
                py
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r##"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="#555">{:.1}</text>"##,
                px,
                MARGIN_TOP + plot_h + 18.0,
                fx
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r##"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12" fill="#555">{:.1}</text>"##,
                MARGIN_LEFT - 8.0,
                py + 4.0,
                fy
            ));
            svg.push('\n');
        }

        // Axes
        svg.push_str(&format!(
            r##"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#333" stroke-width="1.5"/>"##,
            MARGIN_LEFT,
            MARGIN_TOP + plot_h,
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + plot_h
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#333" stroke-width="1.5"/>"##,
            MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, MARGIN_TOP + plot_h
        ));
        svg.push('\n');

        // Axis labels
        svg.push_str(&format!(
            r##"  <text x="{}" y="{}" text-anchor="middle" font-size="14" fill="#333">{}</text>"##,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 14.0,
            escape_xml(&self.x_label)
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r##"  <text x="18" y="{}" text-anchor="middle" font-size="14" fill="#333" transform="rotate(-90 18 {})">{}</text>"##,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape_xml(&self.y_label)
        ));
        svg.push('\n');

        // Series
        for series in &self.series {
            match series.kind {
                SeriesKind::Line => {
                    let path: Vec<String> = series
                        .points
                        .iter()
                        .map(|p| format!("{:.1},{:.1}", sx(p.x), sy(p.y)))
                        .collect();
                    svg.push_str(&format!(
                        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="2.5"/>"#,
                        path.join(" "),
                        series.color
                    ));
                    svg.push('\n');
                }
                SeriesKind::Points => {
                    for point in &series.points {
                        svg.push_str(&format!(
                            r#"  <circle cx="{:.1}" cy="{:.1}" r="6" fill="{}" fill-opacity="0.6">"#,
                            sx(point.x),
                            sy(point.y),
                            series.color
                        ));
                        if let Some(tooltip) = &point.tooltip {
                            svg.push_str(&format!("<title>{}</title>", escape_xml(tooltip)));
                        }
                        svg.push_str("</circle>\n");
                    }
                }
            }
        }

        // Legend, top right
        for (i, series) in self.series.iter().enumerate() {
            let ly = MARGIN_TOP + 14.0 + 20.0 * i as f64;
            let lx = MARGIN_LEFT + plot_w - 150.0;
            svg.push_str(&format!(
                r#"  <rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
                lx,
                ly - 10.0,
                series.color
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r##"  <text x="{:.1}" y="{:.1}" font-size="13" fill="#333">{}</text>"##,
                lx + 18.0,
                ly,
                escape_xml(&series.name)
            ));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Assemble the chart for a finished report
///
/// Colors follow the conventional exploratory palette: observations in
/// dark orange, fitted values in lime green, smooth adjustments in indigo.
pub fn from_report(report: &AnalysisReport) -> ScatterChart {
    let mut chart = ScatterChart::new(
        &format!("{} ~ {}", report.response, report.predictor),
        &report.predictor,
        &report.response,
    );

    let tooltip = |row: usize| -> Option<String> {
        let value = report.y_values[row];
        match report.labels.as_ref().and_then(|l| l.get(row)) {
            Some(label) => Some(format!("{} {}", label, value)),
            None => Some(format!("{} {}", report.x_values[row], value)),
        }
    };

    chart.add_series(Series {
        name: report.response.clone(),
        color: "darkorange".to_string(),
        kind: SeriesKind::Points,
        points: (0..report.n_observations)
            .map(|row| DataPoint {
                x: report.x_values[row],
                y: report.y_values[row],
                tooltip: tooltip(row),
            })
            .collect(),
    });

    match report.kind {
        StudyKind::Categorical => {
            chart.add_series(Series {
                name: "fitted".to_string(),
                color: "limegreen".to_string(),
                kind: SeriesKind::Points,
                points: (0..report.n_observations)
                    .map(|row| DataPoint {
                        x: report.x_values[row],
                        y: report.primary.fitted[row],
                        tooltip: Some(format!("fitted {:.3}", report.primary.fitted[row])),
                    })
                    .collect(),
            });

            if let Some(curve) = &report.curve {
                chart.add_series(Series {
                    name: "interpolated".to_string(),
                    color: "indigo".to_string(),
                    kind: SeriesKind::Line,
                    points: curve
                        .iter()
                        .map(|&(x, y)| DataPoint {
                            x,
                            y,
                            tooltip: None,
                        })
                        .collect(),
                });
            }
        }
        StudyKind::Continuous => {
            let (x_lo, x_hi) = x_span(&report.x_values);
            chart.add_series(Series {
                name: "linear fit".to_string(),
                color: "limegreen".to_string(),
                kind: SeriesKind::Line,
                points: vec![
                    DataPoint {
                        x: x_lo,
                        y: report.primary.predict(&[x_lo]),
                        tooltip: None,
                    },
                    DataPoint {
                        x: x_hi,
                        y: report.primary.predict(&[x_hi]),
                        tooltip: None,
                    },
                ],
            });

            if let Some(boxcox) = &report.boxcox {
                // Box-Cox fit drawn on the original scale via the inverse
                let points = (0..=50)
                    .map(|i| {
                        let x = x_lo + (x_hi - x_lo) * f64::from(i) / 50.0;
                        DataPoint {
                            x,
                            y: inverse_value(boxcox.model.predict(&[x]), boxcox.lambda),
                            tooltip: None,
                        }
                    })
                    .collect();
                chart.add_series(Series {
                    name: "box-cox fit".to_string(),
                    color: "indigo".to_string(),
                    kind: SeriesKind::Line,
                    points,
                });
            }
        }
    }

    chart
}

fn x_span(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}
