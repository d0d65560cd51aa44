use serde::{Deserialize, Serialize};

use crate::core::{Interpolation, Margin, MarginUpdate};
use crate::error::{ChartError, ChartResult};

/// Plain-data settings of a [`super::LineChart`].
///
/// Accessors, `defined` and the color function are closures and live on the
/// chart itself; everything here round-trips through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
    /// Stroke width for series that do not carry their own.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub interpolate: Interpolation,
    #[serde(default)]
    pub clip_edge: bool,
    /// Animation duration in milliseconds.
    #[serde(default = "default_duration")]
    pub duration: u64,
    #[serde(default)]
    pub use_log_scale: bool,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            stroke_width: default_stroke_width(),
            interpolate: Interpolation::default(),
            clip_edge: false,
            duration: default_duration(),
            use_log_scale: false,
        }
    }
}

impl LineChartConfig {
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Merges `update` into the current margin.
    #[must_use]
    pub fn with_margin(mut self, update: MarginUpdate) -> Self {
        self.margin.merge(update);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    #[must_use]
    pub fn with_interpolate(mut self, interpolate: Interpolation) -> Self {
        self.interpolate = interpolate;
        self
    }

    #[must_use]
    pub fn with_clip_edge(mut self, clip_edge: bool) -> Self {
        self.clip_edge = clip_edge;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = duration_ms;
        self
    }

    #[must_use]
    pub fn with_use_log_scale(mut self, use_log_scale: bool) -> Self {
        self.use_log_scale = use_log_scale;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("strokeWidth", self.stroke_width),
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
        ] {
            if !value.is_finite() {
                return Err(ChartError::invalid_option(name, "must be finite"));
            }
        }
        if self.stroke_width < 0.0 {
            return Err(ChartError::invalid_option("strokeWidth", "must be >= 0"));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_width() -> f64 {
    960.0
}

fn default_height() -> f64 {
    500.0
}

fn default_stroke_width() -> f64 {
    1.5
}

fn default_duration() -> u64 {
    250
}
