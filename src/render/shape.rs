//! Path generators: polylines, monotone-X curves, filled areas, leader curves.

use std::fmt::Write as _;

use crate::render::dom::fmt_num;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Move(f64, f64),
    Line(f64, f64),
    Quad(f64, f64, f64, f64),
    Cubic(f64, f64, f64, f64, f64, f64),
    Close,
}

/// An SVG path under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::Move(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::Line(x, y));
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.segments.push(Segment::Quad(cx, cy, x, y));
    }

    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.segments.push(Segment::Cubic(c1x, c1y, c2x, c2y, x, y));
    }

    pub fn close(&mut self) {
        self.segments.push(Segment::Close);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            let _ = match *seg {
                Segment::Move(x, y) => write!(out, "M{},{}", fmt_num(x), fmt_num(y)),
                Segment::Line(x, y) => write!(out, "L{},{}", fmt_num(x), fmt_num(y)),
                Segment::Quad(cx, cy, x, y) => write!(
                    out,
                    "Q{},{},{},{}",
                    fmt_num(cx),
                    fmt_num(cy),
                    fmt_num(x),
                    fmt_num(y)
                ),
                Segment::Cubic(a, b, c, d, x, y) => write!(
                    out,
                    "C{},{},{},{},{},{}",
                    fmt_num(a),
                    fmt_num(b),
                    fmt_num(c),
                    fmt_num(d),
                    fmt_num(x),
                    fmt_num(y)
                ),
                Segment::Close => write!(out, "Z"),
            };
        }
        out
    }

    /// Approximate drawn length (curves sampled), for stroke-dash draw-in.
    pub fn length(&self) -> f64 {
        const SAMPLES: usize = 16;
        let mut total = 0.0;
        let (mut cx, mut cy) = (0.0, 0.0);
        let (mut sx, mut sy) = (0.0, 0.0);
        for seg in &self.segments {
            match *seg {
                Segment::Move(x, y) => {
                    (cx, cy) = (x, y);
                    (sx, sy) = (x, y);
                }
                Segment::Line(x, y) => {
                    total += (x - cx).hypot(y - cy);
                    (cx, cy) = (x, y);
                }
                Segment::Quad(qx, qy, x, y) => {
                    let (mut px, mut py) = (cx, cy);
                    for i in 1..=SAMPLES {
                        let t = i as f64 / SAMPLES as f64;
                        let u = 1.0 - t;
                        let nx = u * u * cx + 2.0 * u * t * qx + t * t * x;
                        let ny = u * u * cy + 2.0 * u * t * qy + t * t * y;
                        total += (nx - px).hypot(ny - py);
                        (px, py) = (nx, ny);
                    }
                    (cx, cy) = (x, y);
                }
                Segment::Cubic(ax, ay, bx, by, x, y) => {
                    let (mut px, mut py) = (cx, cy);
                    for i in 1..=SAMPLES {
                        let t = i as f64 / SAMPLES as f64;
                        let u = 1.0 - t;
                        let nx = u * u * u * cx + 3.0 * u * u * t * ax + 3.0 * u * t * t * bx + t * t * t * x;
                        let ny = u * u * u * cy + 3.0 * u * u * t * ay + 3.0 * u * t * t * by + t * t * t * y;
                        total += (nx - px).hypot(ny - py);
                        (px, py) = (nx, ny);
                    }
                    (cx, cy) = (x, y);
                }
                Segment::Close => {
                    total += (sx - cx).hypot(sy - cy);
                    (cx, cy) = (sx, sy);
                }
            }
        }
        total
    }
}

/// Straight segments through `points`.
pub fn linear(points: &[(f64, f64)]) -> Path {
    let mut path = Path::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Monotone cubic interpolation in x (Steffen's method, as d3's `curveMonotoneX`).
///
/// `points` must be sorted by x. The curve never overshoots between samples,
/// so a density never dips below zero between integer win totals.
pub fn monotone_x(points: &[(f64, f64)]) -> Path {
    let n = points.len();
    if n < 3 {
        return linear(points);
    }
    let h: Vec<f64> = points.windows(2).map(|w| w[1].0 - w[0].0).collect();
    let s: Vec<f64> = points
        .windows(2)
        .zip(&h)
        .map(|(w, &h)| if h != 0.0 { (w[1].1 - w[0].1) / h } else { 0.0 })
        .collect();

    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        let (h0, h1) = (h[i - 1], h[i]);
        let (s0, s1) = (s[i - 1], s[i]);
        let p = if h0 + h1 != 0.0 { (s0 * h1 + s1 * h0) / (h0 + h1) } else { 0.0 };
        let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        tangents[i] = if t.is_finite() { t } else { 0.0 };
    }
    let slope2 = |h: f64, dy: f64, t: f64| if h != 0.0 { (3.0 * dy / h - t) / 2.0 } else { t };
    tangents[0] = slope2(h[0], points[1].1 - points[0].1, tangents[1]);
    tangents[n - 1] = slope2(h[n - 2], points[n - 1].1 - points[n - 2].1, tangents[n - 2]);

    let mut path = Path::new();
    path.move_to(points[0].0, points[0].1);
    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = (x1 - x0) / 3.0;
        path.cubic_to(
            x0 + dx,
            y0 + dx * tangents[i],
            x1 - dx,
            y1 - dx * tangents[i + 1],
            x1,
            y1,
        );
    }
    path
}

/// Closed monotone area between the curve through `points` and `baseline`.
pub fn monotone_area(points: &[(f64, f64)], baseline: f64) -> Path {
    let mut path = monotone_x(points);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        path.line_to(last.0, baseline);
        path.line_to(first.0, baseline);
        path.close();
    }
    path
}

/// Curved leader from an annotation label back to its anchor.
///
/// Bends through the corner `(to.x, from.y)` so the line leaves the label
/// horizontally and meets the anchor vertically.
pub fn leader_curve(from: (f64, f64), to: (f64, f64)) -> Path {
    let mut path = Path::new();
    path.move_to(from.0, from.1);
    path.quad_to(to.0, from.1, to.0, to.1);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_path_and_length() {
        let p = linear(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert_eq!(p.to_svg(), "M0,0L3,4L3,10");
        assert_eq!(p.length(), 11.0);
    }

    #[test]
    fn monotone_with_two_points_is_a_line() {
        assert_eq!(monotone_x(&[(0.0, 0.0), (10.0, 5.0)]).to_svg(), "M0,0L10,5");
    }

    #[test]
    fn monotone_flat_peak_has_horizontal_tangent() {
        // Local maximum at the middle point: interior tangent must be zero.
        let p = monotone_x(&[(0.0, 10.0), (10.0, 0.0), (20.0, 10.0)]);
        let svg = p.to_svg();
        assert!(svg.starts_with("M0,10C"));
        assert!(svg.contains(",6.67,0,10,0C13.33,0,"), "{svg}");
    }

    #[test]
    fn monotone_does_not_overshoot() {
        let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 10.0), (3.0, 10.0)];
        let p = monotone_x(&pts);
        // Second control point of the first segment stays on the flat run.
        assert!(p.to_svg().starts_with("M0,0C0.33,0,0.67,0,1,0"));
    }

    #[test]
    fn area_closes_on_baseline() {
        let p = monotone_area(&[(0.0, 5.0), (10.0, 2.0)], 20.0);
        assert_eq!(p.to_svg(), "M0,5L10,2L10,20L0,20Z");
    }

    #[test]
    fn leader_curve_bends_at_corner() {
        assert_eq!(leader_curve((0.0, 0.0), (10.0, 20.0)).to_svg(), "M0,0Q10,0,10,20");
    }
}
