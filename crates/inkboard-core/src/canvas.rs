//! Whiteboard state holder: event dispatch and change notification.

use crate::history::{History, Snapshot};
use crate::input::WhiteboardEvent;
use crate::selection::SelectionSession;
use crate::shapes::{ArgbColor, Shape};
use crate::state::{DocumentState, TransientTransform};
use crate::tools::{DrawingSession, Tool};
use kurbo::{Point, Rect, Size};
use std::sync::Arc;
use tokio::sync::watch;

/// Screen padding kept around content by [`Whiteboard::fit_to_content`].
pub const FIT_PADDING: f64 = 50.0;

/// The editing session.
///
/// Owns the authoritative [`DocumentState`] and applies events to it one at a
/// time. The current state is the value held by the change channel. An event
/// edits it in place while nobody else holds that `Arc`, and copies it first
/// otherwise, so a state handed out by [`state`](Self::state) or cloned from a
/// receiver never changes afterwards.
#[derive(Debug)]
pub struct Whiteboard {
    editor: Editor,
    notifier: watch::Sender<Arc<DocumentState>>,
}

/// Interaction state that is not part of the published document.
#[derive(Debug, Default)]
struct Editor {
    history: History,
    drawing: DrawingSession,
    selection: SelectionSession,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Whiteboard {
    /// Create a whiteboard with an empty document.
    pub fn new() -> Self {
        Self::with_shapes(Vec::new())
    }

    /// Create a whiteboard around shapes restored from storage.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        let (notifier, _) = watch::channel(Arc::new(DocumentState::with_shapes(shapes)));
        Self {
            editor: Editor::default(),
            notifier,
        }
    }

    /// Current document state.
    ///
    /// Holding on to the returned value makes the next event copy the state
    /// instead of editing it in place.
    pub fn state(&self) -> Arc<DocumentState> {
        Arc::clone(&*self.notifier.borrow())
    }

    /// Receive every state published from now on.
    ///
    /// Receivers should clone what they need out of `borrow()` rather than
    /// keep the guard alive.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DocumentState>> {
        self.notifier.subscribe()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.history.can_redo()
    }

    /// Convert a screen position to world coordinates for the current viewport.
    pub fn to_world(&self, screen_point: Point) -> Point {
        self.notifier.borrow().viewport.screen_to_world(screen_point)
    }

    /// Apply one input event and publish the resulting state.
    pub fn handle(&mut self, event: WhiteboardEvent) {
        let editor = &mut self.editor;
        self.notifier
            .send_modify(|state| editor.apply(Arc::make_mut(state), event));
    }

    /// Zoom and pan so every committed shape is visible in `viewport_size`.
    pub fn fit_to_content(&mut self, viewport_size: Size) {
        self.notifier.send_if_modified(|state| {
            let Some(bounds) = content_bounds(&state.shapes) else {
                return false;
            };
            Arc::make_mut(state)
                .viewport
                .fit_to_bounds(bounds, viewport_size, FIT_PADDING);
            true
        });
    }
}

impl Editor {
    fn apply(&mut self, state: &mut DocumentState, event: WhiteboardEvent) {
        if event.is_pointer() && state.tool == Tool::Hand {
            // Panning is driven by viewport events.
            return;
        }

        match event {
            WhiteboardEvent::SelectTool(tool) => self.select_tool(state, tool),
            WhiteboardEvent::Begin(point) => {
                if state.tool == Tool::Selector {
                    self.selection.begin(state, &mut self.history, point);
                } else if state.tool.draws() {
                    self.drawing.begin(state, point);
                }
            }
            WhiteboardEvent::Extend(point) => {
                if state.tool == Tool::Selector {
                    self.selection.extend(state, point);
                } else if state.tool.draws() {
                    self.drawing.extend(state, point);
                }
            }
            WhiteboardEvent::Commit => {
                if state.tool == Tool::Selector {
                    self.selection.commit(state, &mut self.history);
                } else {
                    self.drawing.commit(state, &mut self.history);
                }
            }
            WhiteboardEvent::TransformStart => self.selection.transform_start(state),
            WhiteboardEvent::Transform {
                zoom,
                pan,
                rotation,
            } => self.selection.transform(state, zoom, pan, rotation),
            WhiteboardEvent::TransformEnd => self.selection.transform_end(state, &mut self.history),
            WhiteboardEvent::Resize { handle, delta } => {
                self.selection.resize(state, handle, delta)
            }
            WhiteboardEvent::DeleteSelected => {
                self.selection.delete_selected(state, &mut self.history);
            }
            WhiteboardEvent::ViewportGesture { zoom, pan } => {
                state.viewport.apply_gesture(zoom, pan)
            }
            WhiteboardEvent::SetViewport { zoom, pan } => state.viewport.snap_to(zoom, pan),
            WhiteboardEvent::Undo => self.undo(state),
            WhiteboardEvent::Redo => self.redo(state),
            WhiteboardEvent::StrokeWidth(width) => self.set_stroke_width(state, width),
            WhiteboardEvent::Color(color) => self.set_color(state, color),
            WhiteboardEvent::Background(color) => state.background_color = color,
        }
    }

    fn select_tool(&mut self, state: &mut DocumentState, tool: Tool) {
        self.drawing.cancel(state);
        self.selection.finish(state, &mut self.history);
        if tool != Tool::Selector {
            state.selected_shape_id = None;
        }
        state.tool = tool;
        log::debug!("Selected tool {}", tool);
    }

    /// With a shape selected only that shape is restyled; otherwise the
    /// setting applies to future shapes.
    fn set_color(&mut self, state: &mut DocumentState, color: ArgbColor) {
        if !self
            .selection
            .restyle(state, &mut self.history, |shape| shape.with_color(color))
        {
            state.color = color;
        }
    }

    fn set_stroke_width(&mut self, state: &mut DocumentState, width: f64) {
        if !(width.is_finite() && width > 0.0) {
            log::debug!("Ignoring stroke width {}", width);
            return;
        }
        if !self
            .selection
            .restyle(state, &mut self.history, |shape| shape.with_stroke_width(width))
        {
            state.stroke_width = width;
        }
    }

    fn undo(&mut self, state: &mut DocumentState) {
        self.end_interactions(state);
        if let Some(snapshot) = self.history.undo(Arc::clone(&state.shapes)) {
            adopt(state, snapshot);
            log::debug!("Undo ({} left)", self.history.undo_len());
        }
    }

    fn redo(&mut self, state: &mut DocumentState) {
        self.end_interactions(state);
        if let Some(snapshot) = self.history.redo(Arc::clone(&state.shapes)) {
            adopt(state, snapshot);
            log::debug!("Redo ({} left)", self.history.redo_len());
        }
    }

    fn end_interactions(&mut self, state: &mut DocumentState) {
        self.drawing.cancel(state);
        self.selection.finish(state, &mut self.history);
    }
}

/// Swap in a history snapshot, dropping a selection whose shape is gone.
fn adopt(state: &mut DocumentState, snapshot: Snapshot) {
    state.shapes = snapshot;
    if state.selected_shape().is_none() {
        state.selected_shape_id = None;
    }
    state.transient = TransientTransform::IDENTITY;
}

fn content_bounds(shapes: &[Shape]) -> Option<Rect> {
    shapes
        .iter()
        .map(Shape::bounds)
        .reduce(|acc, bounds| acc.union(bounds))
}
