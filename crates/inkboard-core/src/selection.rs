//! Selection and manipulation of committed shapes.
//!
//! Drag-move, handle resize and the pinch transform all run inside one
//! transaction: the shape list is snapshotted when the interaction opens and
//! the snapshot is recorded in history when it closes, only if the shapes
//! actually changed.

use crate::hit_test;
use crate::history::{History, Snapshot};
use crate::shapes::Shape;
use crate::state::{DocumentState, TransientTransform};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle hit radius in screen pixels. Divided by zoom to get world units.
pub const HANDLE_HIT_RADIUS: f64 = 25.0;

/// Named handle on a selection's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// Inside the box but on no handle: moves the whole shape.
    Body,
}

impl TransformHandle {
    const CORNERS: [TransformHandle; 4] = [
        TransformHandle::TopLeft,
        TransformHandle::TopRight,
        TransformHandle::BottomLeft,
        TransformHandle::BottomRight,
    ];

    const SIDES: [TransformHandle; 4] = [
        TransformHandle::Top,
        TransformHandle::Bottom,
        TransformHandle::Left,
        TransformHandle::Right,
    ];

    /// Whether dragging this handle reshapes rather than moves.
    pub fn is_resize(self) -> bool {
        self != TransformHandle::Body
    }

    /// Position of the handle on `bounds`, `None` for [`TransformHandle::Body`].
    pub fn position(self, bounds: Rect) -> Option<Point> {
        let center = bounds.center();
        let point = match self {
            TransformHandle::TopLeft => Point::new(bounds.x0, bounds.y0),
            TransformHandle::Top => Point::new(center.x, bounds.y0),
            TransformHandle::TopRight => Point::new(bounds.x1, bounds.y0),
            TransformHandle::Right => Point::new(bounds.x1, center.y),
            TransformHandle::BottomRight => Point::new(bounds.x1, bounds.y1),
            TransformHandle::Bottom => Point::new(center.x, bounds.y1),
            TransformHandle::BottomLeft => Point::new(bounds.x0, bounds.y1),
            TransformHandle::Left => Point::new(bounds.x0, center.y),
            TransformHandle::Body => return None,
        };
        Some(point)
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            TransformHandle::TopLeft | TransformHandle::Left | TransformHandle::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            TransformHandle::TopRight | TransformHandle::Right | TransformHandle::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            TransformHandle::TopLeft | TransformHandle::Top | TransformHandle::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            TransformHandle::BottomLeft | TransformHandle::Bottom | TransformHandle::BottomRight
        )
    }
}

/// Find the handle under `point`: corners, then sides, then the body.
///
/// `zoom` keeps the hit radius constant on screen.
pub fn handle_at(bounds: Rect, point: Point, zoom: f64) -> Option<TransformHandle> {
    let radius = HANDLE_HIT_RADIUS / zoom;
    let near = |handle: &TransformHandle| {
        handle
            .position(bounds)
            .is_some_and(|p| p.distance(point) <= radius)
    };

    TransformHandle::CORNERS
        .iter()
        .chain(TransformHandle::SIDES.iter())
        .find(|h| near(*h))
        .copied()
        .or_else(|| bounds.contains(point).then_some(TransformHandle::Body))
}

/// Move the anchor(s) on the handle's edge or corner by `delta`.
///
/// Left/right move the x of whichever anchor currently is leftmost/rightmost
/// (ties go to `start` for left, `end` for right); top/bottom do the same on
/// y. Freehand strokes and the body handle are not resizable.
pub fn resize(shape: &Shape, handle: TransformHandle, delta: Vec2) -> Option<Shape> {
    let Shape::Geometric(g) = shape else {
        return None;
    };
    if !handle.is_resize() {
        return None;
    }

    let mut g = g.clone();
    if handle.moves_left() {
        if g.start.x <= g.end.x {
            g.start.x += delta.x;
        } else {
            g.end.x += delta.x;
        }
    }
    if handle.moves_right() {
        if g.end.x >= g.start.x {
            g.end.x += delta.x;
        } else {
            g.start.x += delta.x;
        }
    }
    if handle.moves_top() {
        if g.start.y <= g.end.y {
            g.start.y += delta.y;
        } else {
            g.end.y += delta.y;
        }
    }
    if handle.moves_bottom() {
        if g.end.y >= g.start.y {
            g.end.y += delta.y;
        } else {
            g.start.y += delta.y;
        }
    }
    Some(Shape::Geometric(g))
}

/// Bake a transient scale/offset into the shape's geometry.
///
/// Every anchor is scaled about the bounds center, then re-centered at
/// `center + offset`. Rotation is ignored.
pub fn fold_transient(shape: &Shape, transient: &TransientTransform) -> Shape {
    let center = shape.bounds().center();
    let target = center + transient.offset;
    let scale = transient.scale;
    shape.map_points(|p| target + (p - center) * scale)
}

/// Pointer and gesture state for the selector tool.
#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    /// Shape list as it was when the current transaction opened.
    pending: Option<Snapshot>,
    /// Handle being dragged, `None` while moving the whole shape.
    active_handle: Option<TransformHandle>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_handle(&self) -> Option<TransformHandle> {
        self.active_handle
    }

    /// Whether a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    /// Pointer down: grab a handle of the current selection, or pick.
    pub fn begin(&mut self, state: &mut DocumentState, history: &mut History, point: Point) {
        self.close_transaction(state, history);
        state.starting_offset = Some(point);
        self.active_handle = None;

        let handle = state
            .selected_shape()
            .filter(|shape| !shape.is_freehand())
            .and_then(|shape| handle_at(shape.bounds(), point, state.viewport.zoom))
            .filter(|handle| handle.is_resize());
        if let Some(handle) = handle {
            self.active_handle = Some(handle);
            self.open_transaction(state);
            return;
        }

        state.selected_shape_id =
            hit_test::pick(&state.shapes, point, state.background_color).map(Shape::id);
        if state.selected_shape_id.is_some() {
            self.open_transaction(state);
        }
    }

    /// Pointer move: drag the selected shape or its active handle.
    pub fn extend(&mut self, state: &mut DocumentState, point: Point) {
        let (Some(anchor), Some(id)) = (state.starting_offset, state.selected_shape_id) else {
            return;
        };
        let delta = point - anchor;
        state.starting_offset = Some(point);
        if delta == Vec2::ZERO {
            return;
        }

        let Some(shape) = state.shape(id) else {
            return;
        };
        let updated = match self.active_handle {
            Some(handle) => resize(shape, handle, delta),
            None => Some(shape.translated(delta)),
        };
        if let Some(updated) = updated {
            // A gesture ending mid-drag closes the drag's transaction too.
            self.open_transaction(state);
            state.replace_shape(id, updated);
        }
    }

    /// Pointer up.
    pub fn commit(&mut self, state: &mut DocumentState, history: &mut History) {
        state.starting_offset = None;
        self.active_handle = None;
        self.close_transaction(state, history);
    }

    /// Apply one resize step from a host-driven handle drag.
    pub fn resize(
        &mut self,
        state: &mut DocumentState,
        handle: TransformHandle,
        delta: Vec2,
    ) {
        let Some(shape) = state.selected_shape() else {
            return;
        };
        let id = shape.id();
        let updated = if handle.is_resize() {
            resize(shape, handle, delta)
        } else {
            Some(shape.translated(delta))
        };
        if let Some(updated) = updated {
            self.open_transaction(state);
            state.replace_shape(id, updated);
        }
    }

    pub fn transform_start(&mut self, state: &mut DocumentState) {
        if state.selected_shape().is_none() {
            return;
        }
        self.open_transaction(state);
        state.transient = TransientTransform::IDENTITY;
    }

    /// Accumulate one gesture frame into the transient transform.
    ///
    /// `pan` is in screen pixels and is stored in world units.
    pub fn transform(&mut self, state: &mut DocumentState, zoom: f64, pan: Vec2, rotation: f64) {
        if state.selected_shape().is_none() {
            return;
        }
        let transient = &mut state.transient;
        if zoom.is_finite() && zoom > 0.0 {
            transient.scale *= zoom;
        }
        transient.offset += state.viewport.screen_delta_to_world(pan);
        transient.rotation += rotation;
        log::trace!("Transient transform now {:?}", state.transient);
    }

    /// Fold the transient transform into the selected shape and close the
    /// transaction.
    pub fn transform_end(&mut self, state: &mut DocumentState, history: &mut History) {
        let transient = std::mem::take(&mut state.transient);
        let folded = state
            .selected_shape()
            .filter(|_| transient.changes_geometry())
            .map(|shape| (shape.id(), fold_transient(shape, &transient)));
        if let Some((id, folded)) = folded {
            self.open_transaction(state);
            state.replace_shape(id, folded);
        }
        self.close_transaction(state, history);
    }

    /// Remove the selected shape. Returns false when nothing is selected.
    pub fn delete_selected(&mut self, state: &mut DocumentState, history: &mut History) -> bool {
        self.finish(state, history);
        let Some(index) = state.selected_shape_id.and_then(|id| state.index_of(id)) else {
            return false;
        };

        history.record(Arc::clone(&state.shapes));
        let removed = Arc::make_mut(&mut state.shapes).remove(index);
        state.selected_shape_id = None;
        log::debug!("Deleted shape {}", removed.id());
        true
    }

    /// Replace the selected shape by `f(shape)` as one undoable edit.
    ///
    /// Returns false when nothing is selected.
    pub fn restyle(
        &mut self,
        state: &mut DocumentState,
        history: &mut History,
        f: impl FnOnce(&Shape) -> Shape,
    ) -> bool {
        self.finish(state, history);
        let Some(shape) = state.selected_shape() else {
            return false;
        };
        let id = shape.id();
        let updated = f(shape);
        if updated == *shape {
            return true;
        }

        history.record(Arc::clone(&state.shapes));
        state.replace_shape(id, updated);
        true
    }

    /// End whatever interaction is in flight, keeping its edits.
    pub fn finish(&mut self, state: &mut DocumentState, history: &mut History) {
        if !state.transient.is_identity() {
            self.transform_end(state, history);
        }
        self.commit(state, history);
    }

    fn open_transaction(&mut self, state: &DocumentState) {
        if self.pending.is_none() {
            self.pending = Some(Arc::clone(&state.shapes));
        }
    }

    fn close_transaction(&mut self, state: &DocumentState, history: &mut History) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if Arc::ptr_eq(&pending, &state.shapes) || pending == state.shapes {
            log::trace!("Selection transaction closed without changes");
            return;
        }
        history.record(pending);
        log::debug!("Recorded selection edit");
    }
}
