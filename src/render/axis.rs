//! Axis and grid groups for cartesian charts

use super::scale::{BandScale, LinearScale};
use super::surface::{num, Element};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const GRID_COLOR: &str = "#e0e0e0";

/// Categorical axis along the bottom of a plot of height `height`.
///
/// Labels are rotated -45° and anchored at their end so long category
/// names do not collide.
pub fn bottom(x: &BandScale, height: f64) -> Element {
    let (r0, r1) = x.range();
    let mut g = Element::new("g")
        .attr("class", "axis axis-x")
        .attr("transform", format!("translate(0,{})", num(height)))
        .attr("font-size", 10)
        .attr("font-family", "sans-serif");

    g.push(
        Element::new("path")
            .attr("class", "domain")
            .attr("stroke", "currentColor")
            .attr("fill", "none")
            .attr(
                "d",
                format!(
                    "M{},{}V0H{}V{}",
                    num(r0),
                    num(TICK_SIZE),
                    num(r1),
                    num(TICK_SIZE)
                ),
            ),
    );

    for label in x.domain() {
        let Some(center) = x.center(label) else {
            continue;
        };
        g.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate({},0)", num(center)))
                .child(
                    Element::new("line")
                        .attr("stroke", "currentColor")
                        .attr("y2", num(TICK_SIZE)),
                )
                .child(
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("y", num(TICK_SIZE + TICK_PADDING))
                        .attr("dy", "0.71em")
                        .attr("transform", "rotate(-45)")
                        .attr("text-anchor", "end")
                        .text(label.as_str()),
                ),
        );
    }

    g
}

/// Value axis along the left edge with tick labels
pub fn left(y: &LinearScale) -> Element {
    let (r0, r1) = y.range();
    let mut g = Element::new("g")
        .attr("class", "axis axis-y")
        .attr("font-size", 10)
        .attr("font-family", "sans-serif")
        .attr("text-anchor", "end");

    g.push(
        Element::new("path")
            .attr("class", "domain")
            .attr("stroke", "currentColor")
            .attr("fill", "none")
            .attr(
                "d",
                format!(
                    "M{},{}H0V{}H{}",
                    num(-TICK_SIZE),
                    num(r0),
                    num(r1),
                    num(-TICK_SIZE)
                ),
            ),
    );

    for tick in y.ticks() {
        g.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate(0,{})", num(y.scale(tick))))
                .child(
                    Element::new("line")
                        .attr("stroke", "currentColor")
                        .attr("x2", num(-TICK_SIZE)),
                )
                .child(
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("x", num(-(TICK_SIZE + TICK_PADDING)))
                        .attr("dy", "0.32em")
                        .text(y.tick_label(tick)),
                ),
        );
    }

    g
}

/// Horizontal grid lines at the value ticks, spanning `width`, unlabeled
pub fn grid(y: &LinearScale, width: f64) -> Element {
    let mut g = Element::new("g").attr("class", "grid");

    for tick in y.ticks() {
        g.push(
            Element::new("g")
                .attr("class", "tick")
                .attr("transform", format!("translate(0,{})", num(y.scale(tick))))
                .child(
                    Element::new("line")
                        .attr("stroke", GRID_COLOR)
                        .attr("x2", num(width)),
                ),
        );
    }

    g
}
