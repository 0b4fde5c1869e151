//! Inkboard Core Library
//!
//! Document and interaction engine for the Inkboard infinite-canvas whiteboard:
//! shape model, drawing sessions, selection/transform, undo history, viewport
//! mapping and hit-testing. Rendering and application wiring live elsewhere.

pub mod canvas;
pub mod geometry;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod state;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use canvas::Whiteboard;
pub use history::{History, MAX_UNDO_HISTORY, Snapshot};
pub use input::WhiteboardEvent;
pub use selection::{SelectionSession, TransformHandle};
pub use shapes::{ArgbColor, FreeHand, Geometric, Shape, ShapeId};
pub use state::{DocumentState, TransientTransform};
pub use storage::{Storage, StorageError, StorageResult, restore, spawn_autosave};
pub use tools::{DrawingSession, Tool};
pub use viewport::Viewport;
