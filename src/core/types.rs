use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChartError, ChartResult};

/// Conventional `{x, y}` data point.
///
/// A missing y value is stored as `NaN` and maps to/from JSON `null`, which is
/// what the default `defined` predicate treats as a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point with an undefined y value.
    #[must_use]
    pub fn missing(x: f64) -> Self {
        Self { x, y: f64::NAN }
    }

    #[must_use]
    pub fn from_time(time: DateTime<Utc>, y: f64) -> Self {
        Self {
            x: datetime_to_unix_seconds(time),
            y,
        }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self {
            x: datetime_to_unix_seconds(time),
            y: decimal_to_f64(value, "value")?,
        })
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Insets applied to the drawing area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Overwrites only the fields present in `update`.
    pub fn merge(&mut self, update: MarginUpdate) {
        self.top = update.top.unwrap_or(self.top);
        self.right = update.right.unwrap_or(self.right);
        self.bottom = update.bottom.unwrap_or(self.bottom);
        self.left = update.left.unwrap_or(self.left);
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

/// Partial margin; `None` fields keep the current value on merge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginUpdate {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
}

impl MarginUpdate {
    #[must_use]
    pub fn top(mut self, value: f64) -> Self {
        self.top = Some(value);
        self
    }

    #[must_use]
    pub fn right(mut self, value: f64) -> Self {
        self.right = Some(value);
        self
    }

    #[must_use]
    pub fn bottom(mut self, value: f64) -> Self {
        self.bottom = Some(value);
        self
    }

    #[must_use]
    pub fn left(mut self, value: f64) -> Self {
        self.left = Some(value);
        self
    }
}

impl From<Margin> for MarginUpdate {
    fn from(margin: Margin) -> Self {
        Self {
            top: Some(margin.top),
            right: Some(margin.right),
            bottom: Some(margin.bottom),
            left: Some(margin.left),
        }
    }
}

/// Drawing area left after subtracting margins. Either side may be negative
/// when margins exceed the configured size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    #[must_use]
    pub fn from_outer(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width: width - margin.horizontal(),
            height: height - margin.vertical(),
        }
    }

    /// Size usable for a clip rectangle; never negative.
    #[must_use]
    pub fn clip_size(self) -> (f64, f64) {
        (self.width.max(0.0), self.height.max(0.0))
    }
}
