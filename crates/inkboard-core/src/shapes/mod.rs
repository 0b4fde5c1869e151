//! Shape definitions for the whiteboard.

mod freehand;
mod geometric;

pub use freehand::FreeHand;
pub use geometric::Geometric;

use crate::geometry;
use crate::tools::Tool;
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
///
/// Committed shapes always carry a v4 id. In-progress previews carry the nil
/// id, which never reaches the shape list, history or storage.
pub type ShapeId = Uuid;

/// Color packed as a 32-bit ARGB integer (the persisted representation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgbColor(pub u32);

impl ArgbColor {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const TRANSPARENT: Self = Self(0x0000_0000);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Fully transparent colors are never visible on the canvas.
    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

impl Default for ArgbColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for ArgbColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::from_argb(rgba.a, rgba.r, rgba.g, rgba.b)
    }
}

impl From<ArgbColor> for Color {
    fn from(color: ArgbColor) -> Self {
        Color::from_rgba8(color.red(), color.green(), color.blue(), color.alpha())
    }
}

/// A drawable unit: either a freehand stroke or a two-anchor geometric shape.
///
/// Shapes are values. Moves, resizes and transform commits build a new shape
/// with the same id instead of editing one in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    FreeHand(FreeHand),
    Geometric(Geometric),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::FreeHand(s) => s.id,
            Shape::Geometric(s) => s.id,
        }
    }

    pub fn color(&self) -> ArgbColor {
        match self {
            Shape::FreeHand(s) => s.color,
            Shape::Geometric(s) => s.color,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self {
            Shape::FreeHand(s) => s.stroke_width,
            Shape::Geometric(s) => s.stroke_width,
        }
    }

    /// The tool that produced this shape.
    pub fn tool(&self) -> Tool {
        match self {
            Shape::FreeHand(s) => s.tool,
            Shape::Geometric(s) => s.tool,
        }
    }

    /// Axis-aligned bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::FreeHand(s) => s.bounds(),
            Shape::Geometric(s) => s.bounds(),
        }
    }

    /// Geometry handed to the renderer.
    ///
    /// Freehand strokes use their stored path; geometric shapes derive their
    /// outline from the tool that drew them.
    pub fn outline(&self) -> BezPath {
        match self {
            Shape::FreeHand(s) => s.path().clone(),
            Shape::Geometric(s) => match s.tool {
                Tool::ArrowOneSided => geometry::arrow_path(s.start, s.end, false),
                Tool::ArrowTwoSided => geometry::arrow_path(s.start, s.end, true),
                Tool::CircleOutlined | Tool::CircleFilled => geometry::oval_path(s.bounds()),
                Tool::RectangleOutlined | Tool::RectangleFilled => geometry::rect_path(s.bounds()),
                Tool::TriangleOutlined | Tool::TriangleFilled => {
                    geometry::triangle_path(s.start, s.end)
                }
                _ => geometry::line_path(s.start, s.end),
            },
        }
    }

    /// Return a copy shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Shape {
        match self {
            Shape::FreeHand(s) => Shape::FreeHand(s.translated(delta)),
            Shape::Geometric(s) => Shape::Geometric(s.translated(delta)),
        }
    }

    /// Return a copy with every anchor/point passed through `f`.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Shape {
        match self {
            Shape::FreeHand(s) => Shape::FreeHand(s.map_points(f)),
            Shape::Geometric(s) => {
                let mut g = s.clone();
                g.start = f(s.start);
                g.end = f(s.end);
                Shape::Geometric(g)
            }
        }
    }

    pub fn with_color(&self, color: ArgbColor) -> Shape {
        let mut shape = self.clone();
        match &mut shape {
            Shape::FreeHand(s) => s.color = color,
            Shape::Geometric(s) => s.color = color,
        }
        shape
    }

    pub fn with_stroke_width(&self, stroke_width: f64) -> Shape {
        let mut shape = self.clone();
        match &mut shape {
            Shape::FreeHand(s) => s.stroke_width = stroke_width,
            Shape::Geometric(s) => s.stroke_width = stroke_width,
        }
        shape
    }

    /// Check if this shape is a freehand stroke.
    pub fn is_freehand(&self) -> bool {
        matches!(self, Shape::FreeHand(_))
    }

    pub fn as_geometric(&self) -> Option<&Geometric> {
        match self {
            Shape::Geometric(g) => Some(g),
            Shape::FreeHand(_) => None,
        }
    }

    pub fn as_freehand(&self) -> Option<&FreeHand> {
        match self {
            Shape::FreeHand(f) => Some(f),
            Shape::Geometric(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_channels() {
        let color = ArgbColor::from_argb(0x80, 0x12, 0x34, 0x56);
        assert_eq!(color.0, 0x8012_3456);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x12);
        assert_eq!(color.green(), 0x34);
        assert_eq!(color.blue(), 0x56);
        assert!(!color.is_transparent());
        assert!(ArgbColor::TRANSPARENT.is_transparent());
    }

    #[test]
    fn test_peniko_conversion() {
        let color = ArgbColor::from_argb(255, 200, 100, 50);
        let peniko: Color = color.into();
        assert_eq!(ArgbColor::from(peniko), color);
    }

    #[test]
    fn test_geometric_outline_follows_tool() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 50.0);
        let rect = Shape::Geometric(Geometric::new(
            Uuid::new_v4(),
            ArgbColor::BLACK,
            2.0,
            Tool::RectangleOutlined,
            start,
            end,
        ));
        let line = Shape::Geometric(Geometric::new(
            Uuid::new_v4(),
            ArgbColor::BLACK,
            2.0,
            Tool::LinePlain,
            start,
            end,
        ));

        assert_eq!(rect.outline(), geometry::rect_path(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(line.outline(), geometry::line_path(start, end));
    }

    #[test]
    fn test_curved_and_pointed_outlines() {
        let start = Point::new(10.0, 20.0);
        let end = Point::new(110.0, 80.0);
        let shape = |tool| {
            Shape::Geometric(Geometric::new(
                Uuid::new_v4(),
                ArgbColor::BLACK,
                2.0,
                tool,
                start,
                end,
            ))
        };
        let bounds = Rect::new(10.0, 20.0, 110.0, 80.0);

        assert_eq!(
            shape(Tool::ArrowOneSided).outline(),
            geometry::arrow_path(start, end, false)
        );
        assert_eq!(
            shape(Tool::ArrowTwoSided).outline(),
            geometry::arrow_path(start, end, true)
        );
        assert_eq!(
            shape(Tool::TriangleFilled).outline(),
            geometry::triangle_path(start, end)
        );
        assert_eq!(
            shape(Tool::CircleOutlined).outline(),
            geometry::oval_path(bounds)
        );
        assert_eq!(
            shape(Tool::LineDotted).outline(),
            geometry::line_path(start, end)
        );
    }

    #[test]
    fn test_translate_keeps_id() {
        let shape = Shape::Geometric(Geometric::new(
            Uuid::new_v4(),
            ArgbColor::BLACK,
            2.0,
            Tool::LinePlain,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        ));
        let moved = shape.translated(Vec2::new(5.0, -5.0));

        assert_eq!(moved.id(), shape.id());
        let g = moved.as_geometric().unwrap();
        assert_eq!(g.start, Point::new(5.0, -5.0));
        assert_eq!(g.end, Point::new(15.0, 5.0));
    }

    #[test]
    fn test_restyle_returns_new_value() {
        let shape = Shape::FreeHand(FreeHand::new(
            Uuid::new_v4(),
            ArgbColor::BLACK,
            4.0,
            Tool::Pen,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        ));
        let red = ArgbColor::from_argb(255, 255, 0, 0);
        let restyled = shape.with_color(red).with_stroke_width(8.0);

        assert_eq!(shape.color(), ArgbColor::BLACK);
        assert_eq!(restyled.color(), red);
        assert!((restyled.stroke_width() - 8.0).abs() < f64::EPSILON);
        assert_eq!(restyled.id(), shape.id());
    }
}
