use crate::error::ChartResult;
use crate::render::{Element, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates the scene so tests catch malformed geometry, and it
/// records how many marks the last scene carried.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_point_count: usize,
    /// Series groups that carry a line; scatter groups are not counted.
    pub last_group_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, scene: &Element) -> ChartResult<()> {
        scene.validate()?;
        self.last_line_count = scene.select_all("path", "nv-line").len();
        self.last_point_count = scene.select_all("circle", "nv-point").len();
        self.last_group_count = scene
            .select_all("g", "nv-group")
            .into_iter()
            .filter(|group| group.select_child("path", "nv-line").is_some())
            .count();
        Ok(())
    }
}
