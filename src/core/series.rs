use serde::{Deserialize, Serialize};

use crate::core::{Color, Point};

/// One line: a keyed, ordered sequence of points plus presentation hints.
///
/// `key` identifies the series across renders, so it decides whether a line
/// updates in place, enters, or is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series<P = Point> {
    pub key: String,
    pub values: Vec<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub hover: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl<P> Series<P> {
    pub fn new(key: impl Into<String>, values: Vec<P>) -> Self {
        Self {
            key: key.into(),
            values,
            classed: None,
            fill_opacity: None,
            stroke_width: None,
            hover: false,
            disabled: false,
            color: None,
        }
    }

    #[must_use]
    pub fn with_classed(mut self, classed: impl Into<String>) -> Self {
        self.classed = Some(classed.into());
        self
    }

    #[must_use]
    pub fn with_fill_opacity(mut self, fill_opacity: f64) -> Self {
        self.fill_opacity = Some(fill_opacity);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    #[must_use]
    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = hover;
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Series that take part in a render, paired with their input index.
///
/// Disabled series are skipped but keep their original index, so palette
/// colors stay stable while series are toggled.
pub fn visible_series<P>(series: &[Series<P>]) -> impl Iterator<Item = (usize, &Series<P>)> {
    series.iter().enumerate().filter(|(_, s)| !s.disabled)
}
