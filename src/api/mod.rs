mod config;
pub mod dispatch;
mod line_chart;
mod options;
mod scatter;

pub use config::LineChartConfig;
pub use dispatch::{ChartEvent, Dispatcher, EventHandler, EventKind};
pub use line_chart::{LineChart, RenderReport, ScatterMut};
pub use scatter::{ScatterConfig, ScatterLayer};
