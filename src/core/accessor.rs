use std::fmt;
use std::sync::Arc;

use crate::core::Point;

/// Extracts one coordinate from a point and its index in the series.
pub type Accessor<P> = Arc<dyn Fn(&P, usize) -> f64 + Send + Sync>;

/// Decides whether a point continues the line.
pub type DefinedFn<P> = Arc<dyn Fn(&P, usize) -> bool + Send + Sync>;

/// Point types that have a conventional x/y reading.
pub trait Coordinates {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl Coordinates for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl Coordinates for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinates for [f64; 2] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }
}

pub fn accessor<P, F>(f: F) -> Accessor<P>
where
    F: Fn(&P, usize) -> f64 + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn defined_fn<P, F>(f: F) -> DefinedFn<P>
where
    F: Fn(&P, usize) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The x/y accessors and optional `defined` override shared by the line
/// and scatter layers.
pub struct Accessors<P> {
    pub x: Accessor<P>,
    pub y: Accessor<P>,
    /// `None` means "the current y accessor does not yield NaN".
    pub defined: Option<DefinedFn<P>>,
}

impl<P> Accessors<P> {
    pub fn new(x: Accessor<P>, y: Accessor<P>) -> Self {
        Self {
            x,
            y,
            defined: None,
        }
    }

    #[must_use]
    pub fn is_defined(&self, point: &P, index: usize) -> bool {
        match &self.defined {
            Some(defined) => defined(point, index),
            None => !(self.y)(point, index).is_nan(),
        }
    }
}

impl<P: Coordinates + 'static> Default for Accessors<P> {
    fn default() -> Self {
        Self::new(accessor(|p: &P, _| p.x()), accessor(|p: &P, _| p.y()))
    }
}

impl<P> Clone for Accessors<P> {
    fn clone(&self) -> Self {
        Self {
            x: Arc::clone(&self.x),
            y: Arc::clone(&self.y),
            defined: self.defined.clone(),
        }
    }
}

impl<P> fmt::Debug for Accessors<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("defined", &self.defined.as_ref().map(|_| "custom"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Accessors, accessor};
    use crate::core::Point;

    #[test]
    fn default_defined_follows_current_y_accessor() {
        let mut accessors = Accessors::<Point>::default();
        let point = Point::new(f64::NAN, 1.0);
        assert!(accessors.is_defined(&point, 0));

        accessors.y = accessor(|p: &Point, _| p.x);
        assert!(!accessors.is_defined(&point, 0));
    }
}
