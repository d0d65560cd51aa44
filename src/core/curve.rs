//! Curve interpolators that turn one run of projected points into SVG path text.
//!
//! Each interpolator writes the body of a subpath, starting with the first
//! point's `x,y` and without the leading `M`; the line path generator adds
//! the moveto for every run.

use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Tension used by the cardinal and bundle curves.
pub const DEFAULT_TENSION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    #[default]
    Linear,
    LinearClosed,
    Step,
    StepBefore,
    StepAfter,
    Basis,
    BasisOpen,
    BasisClosed,
    Bundle,
    Cardinal,
    CardinalOpen,
    CardinalClosed,
    Monotone,
}

impl Interpolation {
    pub const ALL: [Interpolation; 13] = [
        Self::Linear,
        Self::LinearClosed,
        Self::Step,
        Self::StepBefore,
        Self::StepAfter,
        Self::Basis,
        Self::BasisOpen,
        Self::BasisClosed,
        Self::Bundle,
        Self::Cardinal,
        Self::CardinalOpen,
        Self::CardinalClosed,
        Self::Monotone,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::LinearClosed => "linear-closed",
            Self::Step => "step",
            Self::StepBefore => "step-before",
            Self::StepAfter => "step-after",
            Self::Basis => "basis",
            Self::BasisOpen => "basis-open",
            Self::BasisClosed => "basis-closed",
            Self::Bundle => "bundle",
            Self::Cardinal => "cardinal",
            Self::CardinalOpen => "cardinal-open",
            Self::CardinalClosed => "cardinal-closed",
            Self::Monotone => "monotone",
        }
    }

    /// Appends the subpath body for `points` to `out`.
    pub fn write_curve(self, out: &mut String, points: &[(f64, f64)], tension: f64) {
        if points.is_empty() {
            return;
        }
        match self {
            Self::Linear => linear(out, points),
            Self::LinearClosed => linear_closed(out, points),
            Self::Step => step(out, points),
            Self::StepBefore => step_before(out, points),
            Self::StepAfter => step_after(out, points),
            Self::Basis => basis(out, points),
            Self::BasisOpen => basis_open(out, points),
            Self::BasisClosed => basis_closed(out, points),
            Self::Bundle => bundle(out, points, tension),
            Self::Cardinal => cardinal(out, points, tension),
            Self::CardinalOpen => cardinal_open(out, points, tension),
            Self::CardinalClosed => cardinal_closed(out, points, tension),
            Self::Monotone => monotone(out, points),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = ChartError;

    fn from_str(s: &str) -> ChartResult<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                ChartError::invalid_option("interpolate", format!("unknown curve mode `{s}`"))
            })
    }
}

/// Writes a path number; negative zero prints as `0`.
pub(crate) fn write_num(out: &mut String, value: f64) {
    let value = if value == 0.0 { 0.0 } else { value };
    let _ = write!(out, "{value}");
}

/// Number text as it appears in attribute values.
pub(crate) fn num_text(value: f64) -> String {
    let mut out = String::new();
    write_num(&mut out, value);
    out
}

fn write_point(out: &mut String, (x, y): (f64, f64)) {
    write_num(out, x);
    out.push(',');
    write_num(out, y);
}

fn polyline(out: &mut String, points: &[(f64, f64)]) {
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            out.push('L');
        }
        write_point(out, p);
    }
}

/// A lone point is closed so round caps still paint it.
fn linear(out: &mut String, points: &[(f64, f64)]) {
    polyline(out, points);
    if points.len() == 1 {
        out.push('Z');
    }
}

fn linear_closed(out: &mut String, points: &[(f64, f64)]) {
    polyline(out, points);
    out.push('Z');
}

fn step(out: &mut String, points: &[(f64, f64)]) {
    let mut p = points[0];
    write_point(out, p);
    for &q in &points[1..] {
        out.push('H');
        write_num(out, (p.0 + q.0) / 2.0);
        out.push('V');
        write_num(out, q.1);
        p = q;
    }
    if points.len() > 1 {
        out.push('H');
        write_num(out, p.0);
    }
}

fn step_before(out: &mut String, points: &[(f64, f64)]) {
    write_point(out, points[0]);
    for &q in &points[1..] {
        out.push('V');
        write_num(out, q.1);
        out.push('H');
        write_num(out, q.0);
    }
}

fn step_after(out: &mut String, points: &[(f64, f64)]) {
    write_point(out, points[0]);
    for &q in &points[1..] {
        out.push('H');
        write_num(out, q.0);
        out.push('V');
        write_num(out, q.1);
    }
}

const BASIS_BEZIER1: [f64; 4] = [0.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];
const BASIS_BEZIER2: [f64; 4] = [0.0, 1.0 / 3.0, 2.0 / 3.0, 0.0];
const BASIS_BEZIER3: [f64; 4] = [0.0, 1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0];

fn dot4(a: [f64; 4], b: [f64; 4]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

fn shift_push(window: &mut [f64; 4], value: f64) {
    window.rotate_left(1);
    window[3] = value;
}

fn basis_bezier(out: &mut String, px: [f64; 4], py: [f64; 4]) {
    out.push('C');
    write_point(out, (dot4(BASIS_BEZIER1, px), dot4(BASIS_BEZIER1, py)));
    out.push(',');
    write_point(out, (dot4(BASIS_BEZIER2, px), dot4(BASIS_BEZIER2, py)));
    out.push(',');
    write_point(out, (dot4(BASIS_BEZIER3, px), dot4(BASIS_BEZIER3, py)));
}

fn basis(out: &mut String, points: &[(f64, f64)]) {
    let n = points.len();
    if n < 3 {
        linear(out, points);
        return;
    }

    let (x0, y0) = points[0];
    let mut px = [x0, x0, x0, points[1].0];
    let mut py = [y0, y0, y0, points[1].1];
    write_point(out, (x0, y0));
    out.push('L');
    write_point(out, (dot4(BASIS_BEZIER3, px), dot4(BASIS_BEZIER3, py)));

    // The last point is repeated once to pull the curve onto it.
    let last = points[n - 1];
    for i in 2..=n {
        let p = points.get(i).copied().unwrap_or(last);
        shift_push(&mut px, p.0);
        shift_push(&mut py, p.1);
        basis_bezier(out, px, py);
    }
    out.push('L');
    write_point(out, last);
}

fn basis_open(out: &mut String, points: &[(f64, f64)]) {
    let n = points.len();
    if n < 4 {
        linear(out, points);
        return;
    }

    let mut px = [0.0, points[0].0, points[1].0, points[2].0];
    let mut py = [0.0, points[0].1, points[1].1, points[2].1];
    write_point(out, (dot4(BASIS_BEZIER3, px), dot4(BASIS_BEZIER3, py)));
    for &p in &points[3..] {
        shift_push(&mut px, p.0);
        shift_push(&mut py, p.1);
        basis_bezier(out, px, py);
    }
}

fn basis_closed(out: &mut String, points: &[(f64, f64)]) {
    let n = points.len();
    let mut px = [0.0; 4];
    let mut py = [0.0; 4];
    for i in 0..4 {
        px[i] = points[i % n].0;
        py[i] = points[i % n].1;
    }
    write_point(out, (dot4(BASIS_BEZIER3, px), dot4(BASIS_BEZIER3, py)));
    for i in 4..n + 4 {
        let p = points[i % n];
        shift_push(&mut px, p.0);
        shift_push(&mut py, p.1);
        basis_bezier(out, px, py);
    }
}

fn bundle(out: &mut String, points: &[(f64, f64)], tension: f64) {
    let n = points.len() - 1;
    if n == 0 {
        basis(out, points);
        return;
    }

    let (x0, y0) = points[0];
    let dx = points[n].0 - x0;
    let dy = points[n].1 - y0;
    let straightened: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let t = i as f64 / n as f64;
            (
                tension * x + (1.0 - tension) * (x0 + t * dx),
                tension * y + (1.0 - tension) * (y0 + t * dy),
            )
        })
        .collect();
    basis(out, &straightened);
}

fn cardinal_tangents(points: &[(f64, f64)], tension: f64) -> Vec<(f64, f64)> {
    let a = (1.0 - tension) / 2.0;
    points
        .windows(3)
        .map(|w| (a * (w[2].0 - w[0].0), a * (w[2].1 - w[0].1)))
        .collect()
}

fn cardinal(out: &mut String, points: &[(f64, f64)], tension: f64) {
    if points.len() < 3 {
        linear(out, points);
        return;
    }
    write_point(out, points[0]);
    hermite(out, points, &cardinal_tangents(points, tension));
}

fn cardinal_open(out: &mut String, points: &[(f64, f64)], tension: f64) {
    let n = points.len();
    if n < 4 {
        linear(out, points);
        return;
    }
    write_point(out, points[1]);
    hermite(out, &points[1..n - 1], &cardinal_tangents(points, tension));
}

fn cardinal_closed(out: &mut String, points: &[(f64, f64)], tension: f64) {
    let n = points.len();
    if n < 3 {
        linear_closed(out, points);
        return;
    }

    let mut closed = points.to_vec();
    closed.push(points[0]);

    let mut padded = Vec::with_capacity(n + 3);
    padded.push(points[n - 1]);
    padded.extend_from_slice(&closed);
    padded.push(points[1]);

    write_point(out, points[0]);
    hermite(out, &closed, &cardinal_tangents(&padded, tension));
}

fn slope(p0: (f64, f64), p1: (f64, f64)) -> f64 {
    (p1.1 - p0.1) / (p1.0 - p0.0)
}

fn finite_differences(points: &[(f64, f64)]) -> Vec<f64> {
    let j = points.len() - 1;
    let mut m = vec![0.0; points.len()];
    let mut d = slope(points[0], points[1]);
    m[0] = d;
    for i in 1..j {
        let next = slope(points[i], points[i + 1]);
        m[i] = (d + next) / 2.0;
        d = next;
    }
    m[j] = d;
    m
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

fn monotone_tangents(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut m = finite_differences(points);
    let j = points.len() - 1;

    for i in 0..j {
        let d = slope(points[i], points[i + 1]);
        if d.abs() < 1e-6 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
        } else {
            let a = m[i] / d;
            let b = m[i + 1] / d;
            let s = a * a + b * b;
            if s > 9.0 {
                let s = d * 3.0 / s.sqrt();
                m[i] = s * a;
                m[i + 1] = s * b;
            }
        }
    }

    (0..=j)
        .map(|i| {
            let span = points[j.min(i + 1)].0 - points[i.saturating_sub(1)].0;
            let s = span / (6.0 * (1.0 + m[i] * m[i]));
            (nan_to_zero(s), nan_to_zero(m[i] * s))
        })
        .collect()
}

fn monotone(out: &mut String, points: &[(f64, f64)]) {
    if points.len() < 3 {
        linear(out, points);
        return;
    }
    write_point(out, points[0]);
    hermite(out, points, &monotone_tangents(points));
}

/// Hermite spline body after the first point. When there are two fewer
/// tangents than points the end pieces are quadratic.
fn hermite(out: &mut String, points: &[(f64, f64)], tangents: &[(f64, f64)]) {
    if tangents.is_empty()
        || (points.len() != tangents.len() && points.len() != tangents.len() + 2)
    {
        out.push('L');
        polyline(out, &points[1..]);
        return;
    }

    let quad = points.len() != tangents.len();
    let mut p0 = points[0];
    let mut p = points[1];
    let t0 = tangents[0];
    let mut t = t0;
    let mut pi = 1;

    if quad {
        out.push('Q');
        write_point(out, (p.0 - t0.0 * 2.0 / 3.0, p.1 - t0.1 * 2.0 / 3.0));
        out.push(',');
        write_point(out, p);
        p0 = points[1];
        pi = 2;
    }

    if tangents.len() > 1 {
        t = tangents[1];
        p = points[pi];
        pi += 1;
        out.push('C');
        write_point(out, (p0.0 + t0.0, p0.1 + t0.1));
        out.push(',');
        write_point(out, (p.0 - t.0, p.1 - t.1));
        out.push(',');
        write_point(out, p);
        for &tangent in &tangents[2..] {
            p = points[pi];
            t = tangent;
            out.push('S');
            write_point(out, (p.0 - t.0, p.1 - t.1));
            out.push(',');
            write_point(out, p);
            pi += 1;
        }
    }

    if quad {
        let lp = points[pi];
        out.push('Q');
        write_point(out, (p.0 + t.0 * 2.0 / 3.0, p.1 + t.1 * 2.0 / 3.0));
        out.push(',');
        write_point(out, lp);
    }
}
