//! Document state: the single snapshot every engine component reads and produces.

use crate::shapes::{ArgbColor, Shape, ShapeId};
use crate::tools::Tool;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// Default stroke width for new shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 10.0;

/// Live, uncommitted scale/offset/rotation applied to the selected shape.
///
/// The renderer applies it around the shape's bounding-box center. Rotation
/// is visual feedback only and is never folded into geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransientTransform {
    /// Multiplicative scale.
    pub scale: f64,
    /// Additive offset in world units.
    pub offset: Vec2,
    /// Additive rotation in degrees.
    pub rotation: f64,
}

impl TransientTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
        rotation: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether folding this transform would move any anchor.
    pub fn changes_geometry(&self) -> bool {
        self.scale != 1.0 || self.offset != Vec2::ZERO
    }
}

impl Default for TransientTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Immutable-by-convention snapshot of the whole editing session.
///
/// Handlers edit the published value copy-on-write: in place while nobody
/// else holds it, on a clone otherwise. `shapes` is shared behind an `Arc` so
/// a clone stays cheap and history snapshots can alias it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    /// Committed shapes in paint order (later = on top).
    pub shapes: Arc<Vec<Shape>>,
    /// In-progress shape, not yet committed.
    pub current_shape: Option<Shape>,
    pub selected_shape_id: Option<ShapeId>,
    /// Active tool.
    pub tool: Tool,
    /// Pointer-drag anchor in world coordinates.
    pub starting_offset: Option<Point>,
    pub stroke_width: f64,
    pub color: ArgbColor,
    pub background_color: ArgbColor,
    pub viewport: Viewport,
    pub transient: TransientTransform,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentState {
    /// Create the session-start state with no shapes.
    pub fn new() -> Self {
        Self::with_shapes(Vec::new())
    }

    /// Create the session-start state around an initial shape list.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes: Arc::new(shapes),
            current_shape: None,
            selected_shape_id: None,
            tool: Tool::default(),
            starting_offset: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: ArgbColor::BLACK,
            background_color: ArgbColor::WHITE,
            viewport: Viewport::default(),
            transient: TransientTransform::IDENTITY,
        }
    }

    /// Get a committed shape by ID.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected_shape_id.and_then(|id| self.shape(id))
    }

    /// Replace the shape with `id` by `shape`. Returns false if it isn't present.
    pub(crate) fn replace_shape(&mut self, id: ShapeId, shape: Shape) -> bool {
        match self.index_of(id) {
            Some(index) => {
                Arc::make_mut(&mut self.shapes)[index] = shape;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Geometric;
    use uuid::Uuid;

    #[test]
    fn test_session_start_defaults() {
        let state = DocumentState::new();
        assert!(state.shapes.is_empty());
        assert_eq!(state.tool, Tool::Pen);
        assert!((state.viewport.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(state.viewport.pan, Vec2::ZERO);
        assert!(state.transient.is_identity());
        assert!(state.selected_shape().is_none());
    }

    #[test]
    fn test_replace_shape_leaves_previous_snapshot_intact() {
        let id = Uuid::new_v4();
        let shape = Shape::Geometric(Geometric::new(
            id,
            ArgbColor::BLACK,
            1.0,
            Tool::LinePlain,
            Point::ZERO,
            Point::new(1.0, 1.0),
        ));
        let mut state = DocumentState::with_shapes(vec![shape.clone()]);
        let before = Arc::clone(&state.shapes);

        assert!(state.replace_shape(id, shape.translated(Vec2::new(1.0, 0.0))));
        assert_eq!(before[0], shape);
        assert_ne!(state.shapes[0], shape);
        assert!(!state.replace_shape(Uuid::new_v4(), shape));
    }

    #[test]
    fn test_transient_geometry_change() {
        let mut transient = TransientTransform::IDENTITY;
        transient.rotation = 15.0;
        assert!(!transient.is_identity());
        assert!(!transient.changes_geometry());

        transient.scale = 1.2;
        assert!(transient.changes_geometry());
    }
}
