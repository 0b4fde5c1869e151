//! In-memory storage implementation.

use super::record::{ShapeRecord, from_records, to_records};
use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::shapes::Shape;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Holds the encoded records rather than the shapes, so a save/load cycle
/// goes through the same codec as durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<Option<Vec<ShapeRecord>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records from the last save, if any.
    pub fn records(&self) -> StorageResult<Option<Vec<ShapeRecord>>> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(records.clone())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, shapes: &[Shape]) -> BoxFuture<'_, StorageResult<()>> {
        let records = to_records(shapes);
        Box::pin(async move {
            let mut stored = self
                .records
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            *stored = Some(records);
            Ok(())
        })
    }

    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Shape>>> {
        Box::pin(async move {
            let records = self
                .records()?
                .ok_or_else(|| StorageError::NotFound("memory".to_string()))?;
            Ok(from_records(records))
        })
    }
}
