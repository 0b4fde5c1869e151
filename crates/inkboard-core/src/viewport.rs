//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;

/// Viewport maps between screen pixels and world units.
///
/// `screen = world * zoom + pan`. Pan is unbounded (infinite canvas); zoom is
/// clamped to `[min_zoom, max_zoom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = one world unit per pixel).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to world coordinates: `(p - pan) / zoom`.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.pan.x) / self.zoom,
            (screen_point.y - self.pan.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates: `p * zoom + pan`.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.pan.x,
            world_point.y * self.zoom + self.pan.y,
        )
    }

    /// Convert a screen-space distance to world units.
    pub fn screen_delta_to_world(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Apply one frame of a pinch/pan gesture.
    pub fn apply_gesture(&mut self, zoom_factor: f64, pan_delta: Vec2) {
        self.zoom = self.clamp_zoom(self.zoom * zoom_factor);
        self.pan += pan_delta;
    }

    /// Jump to an explicit zoom/pan pair.
    pub fn snap_to(&mut self, zoom: f64, pan: Vec2) {
        self.zoom = self.clamp_zoom(zoom);
        self.pan = pan;
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = self.clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Adjust pan so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.pan += screen_point - new_screen;
    }

    /// Reset viewport to default position and zoom.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the viewport to show the given bounding box.
    ///
    /// A degenerate axis (a horizontal or vertical line) is fitted on the
    /// other axis only. A single point keeps the current zoom and is centered.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = (bounds.width() > 0.0).then(|| padded_viewport.width / bounds.width());
        let scale_y = (bounds.height() > 0.0).then(|| padded_viewport.height / bounds.height());
        let fit = match (scale_x, scale_y) {
            (Some(x), Some(y)) => Some(x.min(y)),
            (scale, None) | (None, scale) => scale,
        };
        if let Some(fit) = fit {
            self.zoom = self.clamp_zoom(fit);
        }

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        self.pan = Vec2::new(
            viewport.width / 2.0 - bounds_center.x * self.zoom,
            viewport.height / 2.0 - bounds_center.y * self.zoom,
        );
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.zoom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.pan, Vec2::ZERO);
        assert!((viewport.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let viewport = Viewport::new();
        let screen = Point::new(100.0, 200.0);
        assert_eq!(viewport.screen_to_world(screen), screen);
    }

    #[test]
    fn test_screen_to_world_with_zoom_and_pan() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        viewport.pan = Vec2::new(100.0, 100.0);

        let world = viewport.screen_to_world(Point::new(300.0, 300.0));
        assert_eq!(world, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        for zoom in [MIN_ZOOM, 0.37, 1.0, 1.5, 3.3, MAX_ZOOM] {
            let viewport = Viewport {
                pan: Vec2::new(30.0, -20.0),
                zoom,
                ..Viewport::default()
            };

            let original = Point::new(123.0, -456.0);
            let back = viewport.screen_to_world(viewport.world_to_screen(original));
            assert!((back.x - original.x).abs() < 1e-9);
            assert!((back.y - original.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_transform_matches_world_to_screen() {
        let viewport = Viewport {
            pan: Vec2::new(12.0, 34.0),
            zoom: 2.5,
            ..Viewport::default()
        };
        let p = Point::new(7.0, -3.0);
        let a = viewport.transform() * p;
        let b = viewport.world_to_screen(p);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_gesture_zoom_clamp() {
        let mut viewport = Viewport::new();
        for _ in 0..50 {
            viewport.apply_gesture(0.5, Vec2::ZERO);
        }
        assert!((viewport.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        for _ in 0..50 {
            viewport.apply_gesture(2.0, Vec2::ZERO);
        }
        assert!((viewport.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gesture_pan_is_unbounded() {
        let mut viewport = Viewport::new();
        viewport.apply_gesture(1.0, Vec2::new(1e7, -1e7));
        viewport.apply_gesture(1.0, Vec2::new(10.0, 20.0));
        assert_eq!(viewport.pan, Vec2::new(1e7 + 10.0, -1e7 + 20.0));
    }

    #[test]
    fn test_zoom_at_keeps_pivot() {
        let mut viewport = Viewport::new();
        let pivot = Point::new(400.0, 300.0);
        let world_before = viewport.screen_to_world(pivot);

        viewport.zoom_at(pivot, 2.0);
        let world_after = viewport.screen_to_world(pivot);
        assert!((world_before.x - world_after.x).abs() < 1e-9);
        assert!((world_before.y - world_after.y).abs() < 1e-9);
    }

    #[test]
    fn test_snap_to_clamps() {
        let mut viewport = Viewport::new();
        viewport.snap_to(50.0, Vec2::new(5.0, 5.0));
        assert!((viewport.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert_eq!(viewport.pan, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_fit_to_bounds_centers_content() {
        let mut viewport = Viewport::new();
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        viewport.fit_to_bounds(bounds, Size::new(800.0, 600.0), 0.0);

        assert!((viewport.zoom - 4.0).abs() < f64::EPSILON);
        let center = viewport.world_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_horizontal_line() {
        let mut viewport = Viewport::new();
        let bounds = Rect::new(5000.0, 5000.0, 6000.0, 5000.0);
        viewport.fit_to_bounds(bounds, Size::new(800.0, 600.0), 50.0);

        // Fitted on width alone: 700 px for 1000 units.
        assert!((viewport.zoom - 0.7).abs() < 1e-9);
        let center = viewport.world_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_vertical_line() {
        let mut viewport = Viewport::new();
        let bounds = Rect::new(-300.0, 0.0, -300.0, 250.0);
        viewport.fit_to_bounds(bounds, Size::new(800.0, 600.0), 50.0);

        assert!((viewport.zoom - 2.0).abs() < 1e-9);
        let center = viewport.world_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_point_keeps_zoom() {
        let mut viewport = Viewport::new();
        viewport.zoom = 1.5;
        let point = Point::new(4000.0, -2500.0);
        viewport.fit_to_bounds(Rect::from_points(point, point), Size::new(800.0, 600.0), 50.0);

        assert!((viewport.zoom - 1.5).abs() < f64::EPSILON);
        let screen = viewport.world_to_screen(point);
        assert!((screen.x - 400.0).abs() < 1e-9);
        assert!((screen.y - 300.0).abs() < 1e-9);
    }
}
