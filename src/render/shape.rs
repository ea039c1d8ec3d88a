//! Pie layout and arc geometry

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::surface::num;

const EPSILON: f64 = 1e-12;

/// Angular extent of one wedge, in radians clockwise from 12 o'clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Position of the value in the input
    pub index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Lay out wedges for `values` over the full circle.
///
/// Angles are assigned in descending value order starting at 0; the
/// returned slices stay in input order. Non-positive values get empty
/// wedges, so a total of zero yields all-empty wedges. Returns `None` only
/// when the total is not finite.
pub fn pie_layout(values: &[f64]) -> Option<Vec<PieSlice>> {
    let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if !sum.is_finite() {
        return None;
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    // stable: ties keep input order
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let k = if sum > 0.0 { TAU / sum } else { 0.0 };
    let mut slices = vec![
        PieSlice {
            index: 0,
            value: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
        };
        values.len()
    ];

    let mut a0 = 0.0;
    for &j in &order {
        let v = values[j];
        let a1 = a0 + if v > 0.0 { v * k } else { 0.0 };
        slices[j] = PieSlice {
            index: j,
            value: v,
            start_angle: a0,
            end_angle: a1,
        };
        a0 = a1;
    }

    Some(slices)
}

/// Arc generator for pie wedges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Arc {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
        }
    }

    /// SVG path data for a slice, centered on the origin
    pub fn path(&self, slice: &PieSlice) -> String {
        let r1 = self.outer_radius.max(0.0);
        let r0 = self.inner_radius.clamp(0.0, r1);
        let a0 = slice.start_angle - FRAC_PI_2;
        let a1 = slice.end_angle - FRAC_PI_2;
        let da = (a1 - a0).abs();
        let sweep = if a1 > a0 { 1 } else { 0 };

        if r1 < EPSILON {
            return "M0,0Z".to_string();
        }

        if da > TAU - EPSILON {
            // full ring: two half-circle arcs
            let mut d = format!(
                "M{},{}A{r},{r},0,1,{s},{},{}A{r},{r},0,1,{s},{},{}",
                num(r1 * a0.cos()),
                num(r1 * a0.sin()),
                num(-r1 * a0.cos()),
                num(-r1 * a0.sin()),
                num(r1 * a0.cos()),
                num(r1 * a0.sin()),
                r = num(r1),
                s = sweep
            );
            if r0 > EPSILON {
                d.push_str(&format!(
                    "M{},{}A{r},{r},0,1,{s},{},{}A{r},{r},0,1,{s},{},{}",
                    num(r0 * a1.cos()),
                    num(r0 * a1.sin()),
                    num(-r0 * a1.cos()),
                    num(-r0 * a1.sin()),
                    num(r0 * a1.cos()),
                    num(r0 * a1.sin()),
                    r = num(r0),
                    s = 1 - sweep
                ));
            }
            d.push('Z');
            return d;
        }

        let large = if da >= PI { 1 } else { 0 };
        let mut d = format!(
            "M{},{}A{r},{r},0,{l},{s},{},{}",
            num(r1 * a0.cos()),
            num(r1 * a0.sin()),
            num(r1 * a1.cos()),
            num(r1 * a1.sin()),
            r = num(r1),
            l = large,
            s = sweep
        );
        if r0 > EPSILON {
            d.push_str(&format!(
                "L{},{}A{r},{r},0,{l},{s},{},{}",
                num(r0 * a1.cos()),
                num(r0 * a1.sin()),
                num(r0 * a0.cos()),
                num(r0 * a0.sin()),
                r = num(r0),
                l = large,
                s = 1 - sweep
            ));
        } else {
            d.push_str("L0,0");
        }
        d.push('Z');
        d
    }

    /// Midpoint of the slice, halfway between the radii
    pub fn centroid(&self, slice: &PieSlice) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (slice.start_angle + slice.end_angle) / 2.0 - FRAC_PI_2;
        (a.cos() * r, a.sin() * r)
    }
}
