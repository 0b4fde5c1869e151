//! Two-anchor geometric shape (line, arrow, oval, rectangle, triangle).

use super::{ArgbColor, ShapeId};
use crate::tools::Tool;
use kurbo::{Point, Rect, Vec2};

/// A geometric shape defined by two world-space anchors.
///
/// What the anchors mean (line endpoints, bounding corners, triangle base)
/// is decided by `tool` at render and hit-test time.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    pub(crate) id: ShapeId,
    pub color: ArgbColor,
    pub stroke_width: f64,
    pub tool: Tool,
    pub start: Point,
    pub end: Point,
}

impl Geometric {
    pub fn new(
        id: ShapeId,
        color: ArgbColor,
        stroke_width: f64,
        tool: Tool,
        start: Point,
        end: Point,
    ) -> Self {
        Self {
            id,
            color,
            stroke_width,
            tool,
            start,
            end,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Bounding box spanned by the two anchors.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
            ..self.clone()
        }
    }

    pub(crate) fn with_id(&self, id: ShapeId) -> Self {
        Self { id, ..self.clone() }
    }
}
