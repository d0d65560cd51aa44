use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// One rendered point mark, kept for pointer hit testing.
///
/// Pixel coordinates are relative to the plot area (inside the margins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMark {
    pub series_key: String,
    pub series_index: usize,
    pub point_index: usize,
    pub x: f64,
    pub y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

impl PointMark {
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.pixel_x - x).hypot(self.pixel_y - y)
    }

    #[must_use]
    pub fn id(&self) -> (usize, usize) {
        (self.series_index, self.point_index)
    }
}

/// Nearest mark to the pointer within `radius` pixels.
///
/// Ties resolve to the mark drawn last, which is the one on top.
#[must_use]
pub fn nearest_mark(marks: &[PointMark], x: f64, y: f64, radius: f64) -> Option<&PointMark> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    marks
        .iter()
        .rev()
        .map(|mark| (OrderedFloat(mark.distance_to(x, y)), mark))
        .filter(|(distance, _)| distance.0 <= radius)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, mark)| mark)
}

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Over { series_index: usize, point_index: usize },
}

#[cfg(test)]
mod tests {
    use super::{PointMark, nearest_mark};

    fn mark(series_index: usize, point_index: usize, px: f64, py: f64) -> PointMark {
        PointMark {
            series_key: format!("s{series_index}"),
            series_index,
            point_index,
            x: px,
            y: py,
            pixel_x: px,
            pixel_y: py,
        }
    }

    #[test]
    fn picks_closest_mark_inside_radius() {
        let marks = vec![mark(0, 0, 0.0, 0.0), mark(0, 1, 10.0, 0.0), mark(1, 0, 40.0, 0.0)];
        let hit = nearest_mark(&marks, 8.0, 1.0, 25.0).expect("hit");
        assert_eq!(hit.id(), (0, 1));
        assert!(nearest_mark(&marks, 100.0, 100.0, 25.0).is_none());
    }

    #[test]
    fn overlapping_marks_resolve_to_topmost() {
        let marks = vec![mark(0, 0, 5.0, 5.0), mark(1, 0, 5.0, 5.0)];
        let hit = nearest_mark(&marks, 5.0, 5.0, 25.0).expect("hit");
        assert_eq!(hit.series_index, 1);
    }
}
