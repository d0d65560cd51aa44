use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Log,
}

/// Continuous numeric domain to pixel range mapping.
///
/// Mapping never fails: values outside what the scale can represent (for
/// example non-positive input on a log scale) come back non-finite and it is
/// up to the caller to coerce them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl ContinuousScale {
    #[must_use]
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            kind: ScaleKind::Linear,
            domain,
            range,
        }
    }

    #[must_use]
    pub fn log(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            kind: ScaleKind::Log,
            domain,
            range,
        }
    }

    #[must_use]
    pub fn kind(self) -> ScaleKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    /// Maps a domain value into the pixel range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let (d0, d1) = match self.kind {
            ScaleKind::Linear => self.domain,
            ScaleKind::Log => (self.log_of(self.domain.0), self.log_of(self.domain.1)),
        };
        let v = match self.kind {
            ScaleKind::Linear => value,
            ScaleKind::Log => self.log_of(value),
        };

        let span = d1 - d0;
        // A collapsed domain maps everything onto the range start.
        let t = if span == 0.0 { 0.0 } else { (v - d0) / span };
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    // Sign follows the domain start so negative-only domains work too.
    fn log_of(self, value: f64) -> f64 {
        if self.domain.0 >= 0.0 {
            value.max(0.0).ln()
        } else {
            -(-value).max(0.0).ln()
        }
    }
}

impl Default for ContinuousScale {
    fn default() -> Self {
        Self::linear((0.0, 1.0), (0.0, 1.0))
    }
}
