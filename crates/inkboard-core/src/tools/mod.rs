//! Tool system for the whiteboard.

use crate::history::History;
use crate::shapes::{FreeHand, Geometric, Shape, ShapeId};
use crate::state::DocumentState;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tool {
    Selector,
    #[default]
    Pen,
    Eraser,
    Highlighter,
    LaserPen,
    LinePlain,
    LineDotted,
    ArrowOneSided,
    ArrowTwoSided,
    CircleOutlined,
    CircleFilled,
    RectangleOutlined,
    RectangleFilled,
    TriangleOutlined,
    TriangleFilled,
    Hand,
}

impl Tool {
    pub const ALL: [Tool; 16] = [
        Tool::Selector,
        Tool::Pen,
        Tool::Eraser,
        Tool::Highlighter,
        Tool::LaserPen,
        Tool::LinePlain,
        Tool::LineDotted,
        Tool::ArrowOneSided,
        Tool::ArrowTwoSided,
        Tool::CircleOutlined,
        Tool::CircleFilled,
        Tool::RectangleOutlined,
        Tool::RectangleFilled,
        Tool::TriangleOutlined,
        Tool::TriangleFilled,
        Tool::Hand,
    ];

    /// Persisted name of the tool.
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Selector => "SELECTOR",
            Tool::Pen => "PEN",
            Tool::Eraser => "ERASER",
            Tool::Highlighter => "HIGHLIGHTER",
            Tool::LaserPen => "LASER_PEN",
            Tool::LinePlain => "LINE_PLAIN",
            Tool::LineDotted => "LINE_DOTTED",
            Tool::ArrowOneSided => "ARROW_ONE_SIDED",
            Tool::ArrowTwoSided => "ARROW_TWO_SIDED",
            Tool::CircleOutlined => "CIRCLE_OUTLINED",
            Tool::CircleFilled => "CIRCLE_FILLED",
            Tool::RectangleOutlined => "RECTANGLE_OUTLINED",
            Tool::RectangleFilled => "RECTANGLE_FILLED",
            Tool::TriangleOutlined => "TRIANGLE_OUTLINED",
            Tool::TriangleFilled => "TRIANGLE_FILLED",
            Tool::Hand => "HAND",
        }
    }

    /// Tools that accumulate a point list (pen, highlighter, laser, eraser).
    pub fn is_freehand(self) -> bool {
        matches!(
            self,
            Tool::Pen | Tool::Highlighter | Tool::LaserPen | Tool::Eraser
        )
    }

    /// Tools in the two-anchor shape family.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            Tool::LinePlain
                | Tool::LineDotted
                | Tool::ArrowOneSided
                | Tool::ArrowTwoSided
                | Tool::CircleOutlined
                | Tool::CircleFilled
                | Tool::RectangleOutlined
                | Tool::RectangleFilled
                | Tool::TriangleOutlined
                | Tool::TriangleFilled
        )
    }

    /// Filled (as opposed to stroked) rendering.
    pub fn is_filled(self) -> bool {
        matches!(
            self,
            Tool::CircleFilled | Tool::RectangleFilled | Tool::TriangleFilled
        )
    }

    /// Dash pattern hint for the renderer.
    pub fn is_dashed(self) -> bool {
        self == Tool::LineDotted
    }

    /// Whether pointer input with this tool produces a shape.
    pub fn draws(self) -> bool {
        self.is_freehand() || self.is_shape()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tool names that don't match any [`Tool`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// In-progress shape construction for the drawing tools.
///
/// Driven by Begin/Extend/Commit. The shape being drawn lives in
/// `DocumentState::current_shape`; freehand points are appended to it in
/// place, so each Extend costs O(1) amortized.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingSession;

impl DrawingSession {
    pub fn new() -> Self {
        Self
    }

    /// Begin a drawing interaction at `point` (world coordinates).
    pub fn begin(&mut self, state: &mut DocumentState, point: Point) {
        state.selected_shape_id = None;
        state.starting_offset = Some(point);
        state.current_shape = None;

        if state.tool.is_freehand() {
            state.current_shape = Some(Shape::FreeHand(FreeHand::preview(
                state.color,
                state.stroke_width,
                state.tool,
                vec![point],
            )));
        }
    }

    /// Update the preview with the latest pointer position.
    pub fn extend(&mut self, state: &mut DocumentState, point: Point) {
        let tool = state.tool;
        if tool.is_freehand() {
            if let Some(Shape::FreeHand(stroke)) = &mut state.current_shape {
                stroke.push_preview_point(point);
                return;
            }

            // Extend without Begin: seed from the drag anchor if there is one.
            let mut stroke =
                FreeHand::preview(state.color, state.stroke_width, tool, Vec::new());
            if let Some(anchor) = state.starting_offset {
                stroke.push_preview_point(anchor);
            }
            stroke.push_preview_point(point);
            state.current_shape = Some(Shape::FreeHand(stroke));
        } else if tool.is_shape() {
            let Some(start) = state.starting_offset else {
                return;
            };
            state.current_shape = Some(Shape::Geometric(Geometric::new(
                Uuid::nil(),
                state.color,
                state.stroke_width,
                tool,
                start,
                point,
            )));
        }
    }

    /// Finish the interaction, appending the finalized shape to the document.
    ///
    /// Returns the id of the committed shape, or `None` when nothing was in
    /// progress.
    pub fn commit(&mut self, state: &mut DocumentState, history: &mut History) -> Option<ShapeId> {
        state.starting_offset = None;
        let preview = state.current_shape.take()?;

        let id = Uuid::new_v4();
        let shape = match preview {
            Shape::FreeHand(stroke) => Shape::FreeHand(stroke.into_committed(id)),
            Shape::Geometric(g) => Shape::Geometric(g.with_id(id)),
        };

        history.record(Arc::clone(&state.shapes));
        Arc::make_mut(&mut state.shapes).push(shape);
        log::debug!("Committed {} shape {}", state.tool, id);
        Some(id)
    }

    /// Drop any in-progress shape without committing it.
    pub fn cancel(&mut self, state: &mut DocumentState) {
        state.current_shape = None;
        state.starting_offset = None;
    }
}
