//! Path construction for shapes: smoothing, arrows, triangles, bounds.
//!
//! Everything here is a pure function of its inputs, so the same points
//! always produce the same path.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape};

/// Length of each arrowhead segment in world units.
pub const ARROW_HEAD_LENGTH: f64 = 50.0;
/// Angle between the shaft and each arrowhead segment.
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Flattening tolerance used when converting curved shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Build the smoothed outline of a freehand stroke.
///
/// Each consecutive pair is joined by a quadratic curve whose control point
/// is the earlier point and whose endpoint is the pair's midpoint; a final
/// straight segment reaches the true last point.
pub fn smoothed_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(*first);
    for pair in points.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        path.quad_to(prev, prev.midpoint(next));
    }

    if let [_, .., last] = points {
        path.line_to(*last);
    }

    path
}

/// Straight segments through every point (used for live previews).
pub fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(*first);
    for point in &points[1..] {
        path.line_to(*point);
    }
    path
}

pub fn line_path(start: Point, end: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    path.line_to(end);
    path
}

/// Isosceles triangle: apex at the top-center, base along `end.y`.
pub fn triangle_path(start: Point, end: Point) -> BezPath {
    let apex = Point::new((start.x + end.x) / 2.0, start.y);
    let base_left = Point::new(start.x, end.y);
    let base_right = Point::new(end.x, end.y);

    let mut path = BezPath::new();
    path.move_to(apex);
    path.line_to(base_right);
    path.line_to(base_left);
    path.close_path();
    path
}

/// Shaft from `start` to `end` with a head at `end`, and at `start` too when
/// `two_sided` is set.
pub fn arrow_path(start: Point, end: Point, two_sided: bool) -> BezPath {
    let mut path = line_path(start, end);
    add_arrow_head(&mut path, start, end);
    if two_sided {
        add_arrow_head(&mut path, end, start);
    }
    path
}

/// Append a two-segment head pointing at `to`.
fn add_arrow_head(path: &mut BezPath, from: Point, to: Point) {
    let angle = (to.y - from.y).atan2(to.x - from.x);

    let right = Point::new(
        to.x - ARROW_HEAD_LENGTH * (angle - ARROW_HEAD_ANGLE).cos(),
        to.y - ARROW_HEAD_LENGTH * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    let left = Point::new(
        to.x - ARROW_HEAD_LENGTH * (angle + ARROW_HEAD_ANGLE).cos(),
        to.y - ARROW_HEAD_LENGTH * (angle + ARROW_HEAD_ANGLE).sin(),
    );

    path.move_to(to);
    path.line_to(right);
    path.move_to(to);
    path.line_to(left);
}

pub fn rect_path(rect: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(rect.x0, rect.y0));
    path.line_to(Point::new(rect.x1, rect.y0));
    path.line_to(Point::new(rect.x1, rect.y1));
    path.line_to(Point::new(rect.x0, rect.y1));
    path.close_path();
    path
}

/// Oval inscribed in `rect`.
pub fn oval_path(rect: Rect) -> BezPath {
    Ellipse::from_rect(rect).to_path(PATH_TOLERANCE)
}

/// Bounding box of a point list; empty input yields `Rect::ZERO`.
pub fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };

    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |rect, p| {
            rect.union_pt(*p)
        })
}
