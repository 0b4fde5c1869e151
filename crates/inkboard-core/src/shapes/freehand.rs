//! Freehand stroke shape.

use super::{ArgbColor, ShapeId};
use crate::geometry;
use crate::tools::Tool;
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// A freehand stroke (series of world-space points).
///
/// The point list is the source of truth. The path is derived from it: a
/// smoothed outline for committed strokes, a plain polyline for previews.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeHand {
    pub(crate) id: ShapeId,
    pub color: ArgbColor,
    pub stroke_width: f64,
    pub tool: Tool,
    points: Vec<Point>,
    path: BezPath,
}

impl FreeHand {
    /// Create a committed stroke; the outline is smoothed from `points`.
    pub fn new(
        id: ShapeId,
        color: ArgbColor,
        stroke_width: f64,
        tool: Tool,
        points: Vec<Point>,
    ) -> Self {
        let path = geometry::smoothed_path(&points);
        Self {
            id,
            color,
            stroke_width,
            tool,
            points,
            path,
        }
    }

    /// Create an in-progress stroke with a cheap polyline outline.
    pub(crate) fn preview(
        color: ArgbColor,
        stroke_width: f64,
        tool: Tool,
        points: Vec<Point>,
    ) -> Self {
        let path = geometry::polyline_path(&points);
        Self {
            id: Uuid::nil(),
            color,
            stroke_width,
            tool,
            points,
            path,
        }
    }

    /// Append to an in-progress stroke, extending its polyline in place.
    pub(crate) fn push_preview_point(&mut self, point: Point) {
        if self.points.is_empty() {
            self.path.move_to(point);
        } else {
            self.path.line_to(point);
        }
        self.points.push(point);
    }

    /// Turn a preview into a committed stroke with a real id and a smoothed
    /// outline.
    pub(crate) fn into_committed(self, id: ShapeId) -> Self {
        Self::new(id, self.color, self.stroke_width, self.tool, self.points)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The outline handed to the renderer.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        geometry::points_bounds(&self.points)
    }

    /// Shift every point and re-smooth.
    pub fn translated(&self, delta: Vec2) -> Self {
        self.map_points(|p| p + delta)
    }

    /// Pass every point through `f` and re-smooth.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let points: Vec<Point> = self.points.iter().map(|&p| f(p)).collect();
        Self::new(self.id, self.color, self.stroke_width, self.tool, points)
    }
}
