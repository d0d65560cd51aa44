pub mod accessor;
pub mod color;
pub mod curve;
pub mod line_path;
pub mod scale;
pub mod series;
pub mod types;

pub use accessor::{Accessor, Accessors, Coordinates, DefinedFn, accessor, defined_fn};
pub use color::{Color, ColorFn, ColorScheme, SeriesColorContext, category20};
pub use curve::{DEFAULT_TENSION, Interpolation};
pub use line_path::{LinePathGenerator, finite_or_zero};
pub use scale::{ContinuousScale, ScaleKind};
pub use series::{Series, visible_series};
pub use types::{Margin, MarginUpdate, PlotArea, Point};
