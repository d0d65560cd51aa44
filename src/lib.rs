//! line-chart-rs: a multi-series line chart over a retained SVG scene.
//!
//! A [`LineChart`] renders keyed series into an [`render::Element`] tree the
//! way a browser chart mutates its DOM: the wrapper skeleton is created once,
//! series groups are diffed by key, and every changed path comes with a
//! transition record. Point marks, scales and pointer events come from the
//! composed [`api::ScatterLayer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{LineChart, LineChartConfig, RenderReport};
pub use error::{ChartError, ChartResult};
