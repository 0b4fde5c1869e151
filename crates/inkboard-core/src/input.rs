//! Input events accepted by the whiteboard engine.
//!
//! Hosts translate platform input (touch, mouse, stylus, toolbar widgets)
//! into these events. Pointer positions are world coordinates; use
//! [`Whiteboard::to_world`](crate::Whiteboard::to_world) to convert screen
//! pixels first.

use crate::selection::TransformHandle;
use crate::shapes::ArgbColor;
use crate::tools::Tool;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WhiteboardEvent {
    /// Switch the active tool.
    SelectTool(Tool),
    /// Pointer down.
    Begin(Point),
    /// Pointer move while down.
    Extend(Point),
    /// Pointer up.
    Commit,
    /// A pinch/rotate gesture started on the selected shape.
    TransformStart,
    /// One frame of the gesture. `pan` is in screen pixels.
    Transform { zoom: f64, pan: Vec2, rotation: f64 },
    TransformEnd,
    /// Drag a named handle of the selected shape by a world-space delta.
    Resize { handle: TransformHandle, delta: Vec2 },
    DeleteSelected,
    /// One frame of a canvas pinch/pan (relative).
    ViewportGesture { zoom: f64, pan: Vec2 },
    /// Absolute viewport update.
    SetViewport { zoom: f64, pan: Vec2 },
    Undo,
    Redo,
    StrokeWidth(f64),
    Color(ArgbColor),
    Background(ArgbColor),
}

impl WhiteboardEvent {
    /// Pointer events carry a position and are routed by the active tool.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            WhiteboardEvent::Begin(_) | WhiteboardEvent::Extend(_) | WhiteboardEvent::Commit
        )
    }
}
