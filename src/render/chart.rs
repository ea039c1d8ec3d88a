//! Chart Renderer
//!
//! Draws bar, line and pie charts into a [`RenderSurface`]. Every chart is
//! built off-surface first and committed in one step, so a failed draw
//! leaves a cleared surface rather than a half-drawn one.

use super::axis;
use super::error::RenderError;
use super::scale::{BandScale, LinearScale};
use super::shape::{pie_layout, Arc};
use super::surface::{num, Element, RenderSurface, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::config::RenderConfig;
use crate::report::{ChartKind, ChartSpec, Series};

/// Bar fill when the chart lists no colors
pub const DEFAULT_BAR_COLOR: &str = "#4CAF50";
/// Line stroke when the chart lists no colors
pub const DEFAULT_LINE_COLOR: &str = "#2196F3";
/// Pie wedge colors used past the end of a chart's `colors`
pub const FALLBACK_PALETTE: [&str; 6] = [
    "#FF9800", // Orange
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const CAPTION_STYLE: &str = "font-size: 12px; fill: #555";
const BAR_PADDING: f64 = 0.2;
const LINE_PADDING: f64 = 0.1;
const LINE_EXTRA_HEIGHT: f64 = 70.0;
const POINT_RADIUS: f64 = 4.0;
const GROW_DURATION: &str = "1s";
/// Cubic ease-in-out, shared by every bar
const GROW_EASING: &str = "0.65 0 0.35 1";
const PIE_INSET: f64 = 50.0;

const PIE_STYLE: &str = ".arc path { transition: opacity 0.2s; } \
.arc path:hover { opacity: 1; stroke: #fff; stroke-width: 2; }";

/// Margin band around cartesian plots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const STANDARD: Margin = Margin {
        top: 40.0,
        right: 20.0,
        bottom: 60.0,
        left: 60.0,
    };

    fn plot_width(&self) -> f64 {
        CANVAS_WIDTH - self.left - self.right
    }

    fn plot_height(&self) -> f64 {
        CANVAS_HEIGHT - self.top - self.bottom
    }
}

/// Draws chart specs into surfaces
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    bar_color: String,
    line_color: String,
    palette: Vec<String>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            bar_color: config.bar_color.clone(),
            line_color: config.line_color.clone(),
            palette: config.fallback_palette.clone(),
        }
    }

    /// Clear `surface` and draw `spec` into it
    pub fn render(&self, surface: &mut RenderSurface, spec: &ChartSpec) -> Result<(), RenderError> {
        surface.begin_draw();

        let series = spec.primary_series().ok_or(RenderError::NoSeries)?;
        if let Some(index) = series.values().position(|v| !v.is_finite()) {
            return Err(RenderError::NonFiniteValue { index });
        }

        let (height, elements) = match spec.kind {
            ChartKind::Bar => (CANVAS_HEIGHT, self.bar_chart(spec, series)),
            ChartKind::Line => (CANVAS_HEIGHT + LINE_EXTRA_HEIGHT, self.line_chart(spec, series)),
            ChartKind::Pie => (CANVAS_HEIGHT, self.pie_chart(spec, series)?),
        };

        surface.set_size(CANVAS_WIDTH, height);
        surface.set_attr("role", "img");
        surface.set_attr("aria-label", &spec.title);
        for element in elements {
            surface.append(element);
        }
        Ok(())
    }

    fn bar_chart(&self, spec: &ChartSpec, series: &Series) -> Vec<Element> {
        let margin = Margin::STANDARD;
        let width = margin.plot_width();
        let height = margin.plot_height();

        let x = BandScale::new(&series.labels, (0.0, width), BAR_PADDING);
        let y = value_scale(spec, series, height);
        let baseline = y.scale(0.0);
        let fill = spec.color(0).unwrap_or(self.bar_color.as_str());

        let mut g = plot_group(&margin);
        g.push(axis::grid(&y, width));
        g.push(axis::bottom(&x, height));
        g.push(axis::left(&y));

        for (i, value) in series.values().enumerate() {
            let Some(x0) = series.labels.get(i).and_then(|l| x.position(l)) else {
                continue;
            };
            let top = y.scale(value).min(baseline);
            let bar_height = (y.scale(value) - baseline).abs();

            g.push(
                Element::new("rect")
                    .attr("class", "bar")
                    .attr("x", num(x0))
                    .attr("width", num(x.bandwidth()))
                    .attr("y", num(top))
                    .attr("height", num(bar_height))
                    .attr("fill", fill)
                    .child(grow_animation("y", baseline, top))
                    .child(grow_animation("height", 0.0, bar_height)),
            );
        }

        push_labels(&mut g, spec, series, width, height, &margin);
        vec![g]
    }

    fn line_chart(&self, spec: &ChartSpec, series: &Series) -> Vec<Element> {
        let margin = Margin::STANDARD;
        let width = margin.plot_width();
        let height = margin.plot_height() + LINE_EXTRA_HEIGHT;

        let x = BandScale::new(&series.labels, (0.0, width), LINE_PADDING);
        let y = value_scale(spec, series, height);
        let stroke = spec.color(0).unwrap_or(self.line_color.as_str());

        let mut g = plot_group(&margin);
        g.push(axis::grid(&y, width));
        g.push(axis::bottom(&x, height));
        g.push(axis::left(&y));

        let points: Vec<(f64, f64)> = series
            .values()
            .enumerate()
            .filter_map(|(i, value)| {
                let cx = series.labels.get(i).and_then(|l| x.center(l))?;
                Some((cx, y.scale(value)))
            })
            .collect();

        if !points.is_empty() {
            let d: String = points
                .iter()
                .enumerate()
                .map(|(i, (px, py))| {
                    format!("{}{},{}", if i == 0 { "M" } else { "L" }, num(*px), num(*py))
                })
                .collect();
            g.push(
                Element::new("path")
                    .attr("class", "line")
                    .attr("fill", "none")
                    .attr("stroke", stroke)
                    .attr("stroke-width", 2)
                    .attr("d", d),
            );
        }

        for (px, py) in &points {
            g.push(
                Element::new("circle")
                    .attr("class", "dot")
                    .attr("cx", num(*px))
                    .attr("cy", num(*py))
                    .attr("r", num(POINT_RADIUS))
                    .attr("fill", stroke),
            );
        }

        push_labels(&mut g, spec, series, width, height, &margin);
        vec![g]
    }

    fn pie_chart(&self, spec: &ChartSpec, series: &Series) -> Result<Vec<Element>, RenderError> {
        let radius = CANVAS_WIDTH.min(CANVAS_HEIGHT) / 2.0;
        let arc = Arc::new(0.0, radius - PIE_INSET);
        let values: Vec<f64> = series.values().collect();
        let slices = pie_layout(&values).ok_or(RenderError::PieOverflow)?;

        let style = Element::new("style").text(PIE_STYLE);
        let mut g = Element::new("g").attr(
            "transform",
            format!(
                "translate({},{})",
                num(CANVAS_WIDTH / 2.0),
                num(CANVAS_HEIGHT / 2.0)
            ),
        );

        for slice in &slices {
            let (cx, cy) = arc.centroid(slice);
            let label = match series.point_name(slice.index) {
                Some(name) => format!("{}: {}%", name, format_value(slice.value)),
                None => format!("{}%", format_value(slice.value)),
            };

            let mut path = Element::new("path")
                .attr("d", arc.path(slice))
                .attr("opacity", "0.8");
            if let Some(color) = self.wedge_color(spec, slice.index) {
                path.set_attr("fill", color);
            }

            g.push(
                Element::new("g")
                    .attr("class", "arc")
                    .child(path)
                    .child(
                        Element::new("text")
                            .attr("transform", format!("translate({},{})", num(cx), num(cy)))
                            .attr("dy", ".35em")
                            .attr("text-anchor", "middle")
                            .attr("fill", "#fff")
                            .text(label),
                    ),
            );
        }

        g.push(
            Element::new("text")
                .attr("class", "chart-title")
                .attr("x", 0)
                .attr("y", num(-radius + 20.0))
                .attr("text-anchor", "middle")
                .text(spec.title.as_str()),
        );
        if let Some(caption) = spec.caption() {
            g.push(
                Element::new("text")
                    .attr("class", "chart-caption")
                    .attr("x", 0)
                    .attr("y", num(radius - 30.0))
                    .attr("text-anchor", "middle")
                    .attr("style", CAPTION_STYLE)
                    .text(caption),
            );
        }

        Ok(vec![style, g])
    }

    /// Spec color for wedge `index`, else the fallback palette
    fn wedge_color<'a>(&'a self, spec: &'a ChartSpec, index: usize) -> Option<&'a str> {
        spec.color(index).or_else(|| {
            if self.palette.is_empty() {
                None
            } else {
                Some(self.palette[index % self.palette.len()].as_str())
            }
        })
    }
}

fn plot_group(margin: &Margin) -> Element {
    Element::new("g").attr(
        "transform",
        format!("translate({},{})", num(margin.left), num(margin.top)),
    )
}

/// Vertical scale from 0 to the explicit maximum or the data maximum
fn value_scale(spec: &ChartSpec, series: &Series, height: f64) -> LinearScale {
    let max = spec
        .y_maximum()
        .or_else(|| series.max_value().filter(|m| *m > 0.0))
        .unwrap_or(0.0);
    LinearScale::new((0.0, max), (height, 0.0)).nice()
}

fn grow_animation(attribute: &str, from: f64, to: f64) -> Element {
    Element::new("animate")
        .attr("attributeName", attribute)
        .attr("from", num(from))
        .attr("to", num(to))
        .attr("dur", GROW_DURATION)
        .attr("calcMode", "spline")
        .attr("keyTimes", "0;1")
        .attr("keySplines", GROW_EASING)
        .attr("fill", "freeze")
}

/// Title above the plot, series name below the x axis, optional caption
fn push_labels(
    g: &mut Element,
    spec: &ChartSpec,
    series: &Series,
    width: f64,
    height: f64,
    margin: &Margin,
) {
    g.push(
        Element::new("text")
            .attr("class", "chart-title")
            .attr("x", num(width / 2.0))
            .attr("y", num(-margin.top / 2.0))
            .attr("text-anchor", "middle")
            .text(spec.title.as_str()),
    );
    g.push(
        Element::new("text")
            .attr("class", "axis-label")
            .attr("x", num(width / 2.0))
            .attr("y", num(height + margin.bottom - 30.0))
            .attr("text-anchor", "middle")
            .text(series.name.as_str()),
    );
    if let Some(caption) = spec.caption() {
        g.push(
            Element::new("text")
                .attr("class", "chart-caption")
                .attr("x", num(width / 2.0))
                .attr("y", num(height + margin.bottom - 10.0))
                .attr("text-anchor", "middle")
                .attr("style", CAPTION_STYLE)
                .text(caption),
        );
    }
}

/// Render a value the way it was written: integers without a fraction
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
