//! Scales
//!
//! Band scale for categorical axes and a linear scale with tick-aligned
//! ("nice") domains. Semantics follow the conventional charting-library
//! definitions so output lines up with what dashboards usually show.

/// Maps discrete categories to evenly spaced bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Build a band scale; `padding` applies both between and around bands.
    ///
    /// Duplicate categories collapse onto their first band.
    pub fn new<S: AsRef<str>>(labels: &[S], range: (f64, f64), padding: f64) -> Self {
        let mut domain: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            if !domain.iter().any(|d| d == label) {
                domain.push(label.to_string());
            }
        }

        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / f64::max(1.0, n - padding + padding * 2.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        Self {
            domain,
            range,
            padding,
            start,
            step,
            bandwidth,
        }
    }

    /// Left edge of the band for `label`
    pub fn position(&self, label: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|d| d == label)
            .map(|i| self.start + self.step * i as f64)
    }

    /// Center of the band for `label`
    pub fn center(&self, label: &str) -> Option<f64> {
        self.position(label).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Continuous linear mapping from a numeric domain to a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

const DEFAULT_TICK_COUNT: usize = 10;

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extend the domain outward to tick-aligned bounds
    pub fn nice(mut self) -> Self {
        self.domain = nice_domain(self.domain, DEFAULT_TICK_COUNT);
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a value into the range.
    ///
    /// A degenerate domain maps everything to the range start (the baseline).
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Tick values across the domain
    pub fn ticks(&self) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, DEFAULT_TICK_COUNT)
    }

    /// Label text for a tick, with precision matched to the tick step
    pub fn tick_label(&self, value: f64) -> String {
        let step = tick_increment(self.domain.0, self.domain.1, DEFAULT_TICK_COUNT);
        format_tick(value, step)
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick bounds and increment; a negative increment means 1/|inc|
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if start == stop || !start.is_finite() || !stop.is_finite() {
        return 0.0;
    }
    tick_spec(start, stop, count as f64).2
}

/// Tick values between `start` and `stop`
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Round a domain outward to tick-aligned bounds
pub fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (mut start, mut stop) = domain;
    if start == stop || !start.is_finite() || !stop.is_finite() {
        return domain;
    }
    let reverse = stop < start;
    if reverse {
        std::mem::swap(&mut start, &mut stop);
    }

    let mut prestep = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }

    if reverse {
        (stop, start)
    } else {
        (start, stop)
    }
}

/// Format a tick value with digit grouping and step-derived precision
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step < 0.0 {
        // inverse increment: ticks are multiples of 1/|step|
        (-step).log10().ceil().max(0.0) as usize
    } else {
        0
    };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted_is_nonzero(&grouped, frac_part.as_deref()) {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn formatted_is_nonzero(int_part: &str, frac: Option<&str>) -> bool {
    int_part.chars().any(|c| c.is_ascii_digit() && c != '0')
        || frac.map(|f| f.chars().any(|c| c != '0')).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_band_scale_layout() {
        let x = BandScale::new(&["A", "B"], (0.0, 420.0), 0.2);
        // step = 420 / (2 - 0.2 + 0.4) = 190.909...
        assert!(approx(x.step(), 420.0 / 2.2));
        assert!(approx(x.bandwidth(), x.step() * 0.8));
        let a = x.position("A").unwrap();
        let b = x.position("B").unwrap();
        assert!(approx(b - a, x.step()));
        // symmetric outer padding
        assert!(approx(a, 420.0 - (b + x.bandwidth())));
        assert_eq!(x.position("C"), None);
    }

    #[test]
    fn test_band_scale_duplicates_collapse() {
        let x = BandScale::new(&["A", "B", "A"], (0.0, 100.0), 0.1);
        assert_eq!(x.domain().len(), 2);
        assert_eq!(x.position("A"), x.position("A"));
    }

    #[test]
    fn test_band_scale_empty() {
        let x = BandScale::new::<&str>(&[], (0.0, 100.0), 0.2);
        assert!(x.domain().is_empty());
        assert!(x.bandwidth().is_finite());
    }

    #[test]
    fn test_nice_domain_rounds_outward() {
        assert_eq!(nice_domain((0.0, 10.0), 10), (0.0, 10.0));
        assert_eq!(nice_domain((0.0, 97.0), 10), (0.0, 100.0));
        assert_eq!(nice_domain((0.0, 0.83), 10), (0.0, 0.9));
        assert_eq!(nice_domain((0.0, 1234.0), 10), (0.0, 1300.0));
        assert_eq!(nice_domain((0.0, 0.0), 10), (0.0, 0.0));
    }

    #[test]
    fn test_nice_upper_bound_covers_max() {
        for max in [1.0, 3.3, 7.0, 9.99, 42.0, 101.0, 999.0, 12345.6, 0.07] {
            let (lo, hi) = nice_domain((0.0, max), 10);
            assert_eq!(lo, 0.0);
            assert!(hi >= max, "nice({}) = {}", max, hi);
        }
    }

    #[test]
    fn test_ticks() {
        assert_eq!(
            ticks(0.0, 10.0, 10),
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
        );
        assert_eq!(ticks(0.0, 100.0, 10)[1], 10.0);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let y = LinearScale::new((0.0, 10.0), (200.0, 0.0)).nice();
        assert_eq!(y.scale(0.0), 200.0);
        assert_eq!(y.scale(10.0), 0.0);
        assert_eq!(y.scale(5.0), 100.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_baseline() {
        let y = LinearScale::new((0.0, 0.0), (200.0, 0.0)).nice();
        assert_eq!(y.scale(0.0), 200.0);
        assert_eq!(y.ticks(), vec![0.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1000.0, 200.0), "1,000");
        assert_eq!(format_tick(0.2, -10.0), "0.2");
        assert_eq!(format_tick(0.05, -100.0), "0.05");
        assert_eq!(format_tick(-2500.0, 500.0), "-2,500");
        assert_eq!(format_tick(0.0, 1.0), "0");
    }

    #[test]
    fn test_tick_label_uses_scale_step() {
        let y = LinearScale::new((0.0, 0.5), (100.0, 0.0)).nice();
        assert_eq!(y.tick_label(0.25), "0.25");
        let y = LinearScale::new((0.0, 5000.0), (100.0, 0.0)).nice();
        assert_eq!(y.tick_label(5000.0), "5,000");
    }
}
