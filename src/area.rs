//! Area filtering
//!
//! Selects widgets whose whole bounding box lies inside a query rectangle.
//! All four boundaries are inclusive: an edge exactly on the rectangle
//! counts as inside.

use serde::{Deserialize, Serialize};

use crate::widget::Widget;

/// A query rectangle in plane coordinates, corners at (lower_x, lower_y)
/// and (upper_x, upper_y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub lower_x: i64,
    pub lower_y: i64,
    pub upper_x: i64,
    pub upper_y: i64,
}

impl Area {
    pub fn new(lower_x: i64, lower_y: i64, upper_x: i64, upper_y: i64) -> Self {
        Self {
            lower_x,
            lower_y,
            upper_x,
            upper_y,
        }
    }

    /// Whether the widget's bounding box, derived from its center and
    /// dimensions, fits entirely inside this rectangle. Half-dimension
    /// arithmetic runs in f32 to keep fractional extents exact enough for
    /// edge-on-boundary cases.
    pub fn contains(&self, widget: &Widget) -> bool {
        let left = widget.x as f32 - widget.width / 2.0;
        let right = widget.x as f32 + widget.width / 2.0;
        let bottom = widget.y as f32 - widget.height / 2.0;
        let top = widget.y as f32 + widget.height / 2.0;

        left >= self.lower_x as f32
            && bottom >= self.lower_y as f32
            && right <= self.upper_x as f32
            && top <= self.upper_y as f32
    }
}
