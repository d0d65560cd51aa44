mod null_renderer;
mod scene;
mod svg;
pub mod transition;

pub use null_renderer::NullRenderer;
pub use scene::{Element, KeyedJoin};
pub use svg::{SvgRenderer, to_svg_string};
pub use transition::{Transition, TransitionTarget, ease_cubic_in_out, interpolate_string};

use crate::error::ChartResult;

/// Contract implemented by any scene consumer.
///
/// Charts mutate a retained `Element` tree; backends receive the settled
/// tree after a render pass and never reach back into chart state.
pub trait Renderer {
    fn render(&mut self, scene: &Element) -> ChartResult<()>;
}
