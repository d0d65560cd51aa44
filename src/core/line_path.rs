use crate::core::{Accessors, ContinuousScale, DEFAULT_TENSION, Interpolation};

/// Pixel coordinate that is safe to print into path data.
///
/// Anything non-finite (out-of-domain log input, missing data) becomes `0`.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Builds SVG path data for one series against a fixed scale pair.
///
/// The point sequence is split into runs wherever `defined` is false; every
/// run starts a new subpath with `M`, so gaps are never bridged.
pub struct LinePathGenerator<'a, P> {
    accessors: &'a Accessors<P>,
    x_scale: ContinuousScale,
    y_scale: ContinuousScale,
    interpolation: Interpolation,
    tension: f64,
}

impl<'a, P> LinePathGenerator<'a, P> {
    pub fn new(
        accessors: &'a Accessors<P>,
        x_scale: ContinuousScale,
        y_scale: ContinuousScale,
    ) -> Self {
        Self {
            accessors,
            x_scale,
            y_scale,
            interpolation: Interpolation::Linear,
            tension: DEFAULT_TENSION,
        }
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Projects the defined points into pixel space, one `Vec` per run.
    #[must_use]
    pub fn project_runs(&self, values: &[P]) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for (i, point) in values.iter().enumerate() {
            if self.accessors.is_defined(point, i) {
                let x = finite_or_zero(self.x_scale.map((self.accessors.x)(point, i)));
                let y = finite_or_zero(self.y_scale.map((self.accessors.y)(point, i)));
                current.push((x, y));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Path data for `values`, or `None` when no point is defined.
    #[must_use]
    pub fn path(&self, values: &[P]) -> Option<String> {
        let runs = self.project_runs(values);
        if runs.is_empty() {
            return None;
        }

        let mut out = String::new();
        for run in &runs {
            out.push('M');
            self.interpolation.write_curve(&mut out, run, self.tension);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{LinePathGenerator, finite_or_zero};
    use crate::core::{Accessors, ContinuousScale, Interpolation, Point};

    fn scales() -> (ContinuousScale, ContinuousScale) {
        (
            ContinuousScale::linear((0.0, 2.0), (0.0, 960.0)),
            ContinuousScale::linear((0.0, 2.0), (500.0, 0.0)),
        )
    }

    #[test]
    fn undefined_point_breaks_the_path() {
        let accessors = Accessors::<Point>::default();
        let (x, y) = scales();
        let generator = LinePathGenerator::new(&accessors, x, y);
        let values = [Point::new(0.0, 0.0), Point::missing(1.0), Point::new(2.0, 2.0)];

        assert_eq!(generator.path(&values).as_deref(), Some("M0,500ZM960,0Z"));
    }

    #[test]
    fn all_undefined_yields_no_path() {
        let accessors = Accessors::<Point>::default();
        let (x, y) = scales();
        let generator =
            LinePathGenerator::new(&accessors, x, y).with_interpolation(Interpolation::Basis);
        assert_eq!(generator.path(&[Point::missing(0.0)]), None);
        assert_eq!(generator.path(&[]), None);
    }

    #[test]
    fn non_finite_pixels_are_coerced_to_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(12.5), 12.5);

        let accessors = Accessors::<Point>::default();
        let x = ContinuousScale::linear((0.0, 1.0), (0.0, 100.0));
        let y = ContinuousScale::log((1.0, 100.0), (100.0, 0.0));
        let generator = LinePathGenerator::new(&accessors, x, y);
        let path = generator
            .path(&[Point::new(0.0, -3.0), Point::new(1.0, 100.0)])
            .expect("path");
        assert_eq!(path, "M0,0L100,0");
    }
}
