use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.trim().strip_prefix('#').unwrap_or(input.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidData(format!(
                "color `{input}` is not valid hex"
            )));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => {
                return Err(ChartError::InvalidData(format!(
                    "color `{input}` must be #rgb or #rrggbb"
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| -> ChartResult<f64> {
            u8::from_str_radix(&expanded[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ChartError::InvalidData(format!("color `{input}` is not valid hex")))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// CSS text: `#rrggbb` when opaque, `rgba(...)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue)
            )
        } else {
            format!(
                "rgba({},{},{},{})",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                self.alpha
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> ChartResult<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// The twenty-color categorical palette used when no color is configured.
#[must_use]
pub fn category20() -> Vec<Color> {
    CATEGORY20
        .iter()
        .filter_map(|hex| Color::from_hex(hex).ok())
        .collect()
}

/// What a color function sees for one series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesColorContext<'a> {
    pub key: &'a str,
    pub index: usize,
    /// Color set on the series itself, if any.
    pub explicit: Option<Color>,
}

pub type ColorFn = Arc<dyn Fn(SeriesColorContext<'_>) -> Color + Send + Sync>;

/// Per-series color source.
#[derive(Clone)]
pub enum ColorScheme {
    /// Cycles through the palette by series index; a series color wins.
    Palette(Vec<Color>),
    Custom(ColorFn),
}

impl ColorScheme {
    pub fn palette(colors: Vec<Color>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::invalid_option("color", "palette must not be empty"));
        }
        for color in &colors {
            color.validate()?;
        }
        Ok(Self::Palette(colors))
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(SeriesColorContext<'_>) -> Color + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn resolve(&self, ctx: SeriesColorContext<'_>) -> Color {
        match self {
            Self::Palette(colors) => ctx
                .explicit
                .or_else(|| colors.get(ctx.index % colors.len().max(1)).copied())
                .unwrap_or(Color::rgb(0.0, 0.0, 0.0)),
            Self::Custom(f) => f(ctx),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Palette(category20())
    }
}

impl fmt::Debug for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(colors) => f.debug_tuple("Palette").field(colors).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
