//! Storage abstraction for persistence.
//!
//! Only the committed shape list is persisted. Viewport, tool and selection
//! are session state and start fresh on every launch.

mod autosave;
mod file;
mod memory;
mod record;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_DEBOUNCE, spawn_autosave};
pub use file::{DOCUMENT_VERSION, FileStorage};
pub use memory::MemoryStorage;
pub use record::{
    FREEHAND_KIND, RecordError, ShapeRecord, decode_points, encode_points, from_records,
    to_records,
};

use crate::shapes::Shape;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence collaborator for the committed shape list.
///
/// Implementations can store shapes in memory or on the filesystem.
pub trait Storage: Send + Sync {
    /// Replace the stored shapes.
    fn save(&self, shapes: &[Shape]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the stored shapes. Freehand strokes come back re-smoothed.
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Shape>>>;
}

/// Load the initial shape list at startup.
///
/// Never fails: a missing or unreadable store yields an empty document.
pub async fn restore<S: Storage + ?Sized>(storage: &S) -> Vec<Shape> {
    match storage.load().await {
        Ok(shapes) => {
            log::info!("Restored {} shapes", shapes.len());
            shapes
        }
        Err(StorageError::NotFound(what)) => {
            log::info!("No saved board ({}), starting empty", what);
            Vec::new()
        }
        Err(e) => {
            log::warn!("Failed to restore board, starting empty: {}", e);
            Vec::new()
        }
    }
}
