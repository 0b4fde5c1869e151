//! File-based storage implementation for native platforms.

use super::record::{ShapeRecord, from_records, to_records};
use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version written into every document file.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    version: u32,
    shapes: Vec<ShapeRecord>,
}

/// File-based storage for native platforms.
///
/// Stores the board as one JSON document. Writes go to a sibling temp file
/// which is then renamed over the target, so a crash mid-save never leaves a
/// truncated board behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file storage for the given document path.
    ///
    /// The parent directory is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/inkboard/board.json`
    /// On Windows: `%LOCALAPPDATA%\inkboard\board.json`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Ok(Self::new(base.join("inkboard").join("board.json")))
    }

    /// Get the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn save(&self, shapes: &[Shape]) -> BoxFuture<'_, StorageResult<()>> {
        let document = DocumentFile {
            version: DOCUMENT_VERSION,
            shapes: to_records(shapes),
        };
        let count = document.shapes.len();
        let json = match serde_json::to_string_pretty(&document) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }

            let temp = self.temp_path();
            fs::write(&temp, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", temp.display(), e))
            })?;
            fs::rename(&temp, &self.path).map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", self.path.display(), e))
            })?;
            log::debug!("Saved {} shapes to {}", count, self.path.display());
            Ok(())
        })
    }

    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Shape>>> {
        Box::pin(async move {
            if !self.path.exists() {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }

            let json = fs::read_to_string(&self.path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", self.path.display(), e))
            })?;

            let document: DocumentFile = serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            if document.version > DOCUMENT_VERSION {
                return Err(StorageError::Serialization(format!(
                    "Unsupported document version {} in {}",
                    document.version,
                    self.path.display()
                )));
            }

            Ok(from_records(document.shapes))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ArgbColor, FreeHand, Geometric};
    use crate::storage::test_util::block_on;
    use crate::tools::Tool;
    use kurbo::Point;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample() -> Vec<Shape> {
        vec![
            Shape::Geometric(Geometric::new(
                Uuid::new_v4(),
                ArgbColor::BLACK,
                2.0,
                Tool::CircleOutlined,
                Point::new(0.0, 0.0),
                Point::new(40.0, 20.0),
            )),
            Shape::FreeHand(FreeHand::new(
                Uuid::new_v4(),
                ArgbColor::WHITE,
                30.0,
                Tool::Eraser,
                vec![Point::new(1.0, 1.0), Point::new(2.5, 3.25)],
            )),
        ]
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("board.json"));
        let shapes = sample();

        block_on(storage.save(&shapes)).unwrap();
        let loaded = block_on(storage.load()).unwrap();

        assert_eq!(loaded, shapes);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.json"));

        let result = block_on(storage.load());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_document_layout() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("board.json"));
        block_on(storage.save(&sample())).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(json["version"], DOCUMENT_VERSION);
        assert_eq!(json["shapes"][0]["type"], "CIRCLE_OUTLINED");
        assert_eq!(json["shapes"][1]["type"], "FREEHAND");
        assert_eq!(json["shapes"][1]["points"], "1,1;2.5,3.25");
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, "not json").unwrap();

        let result = block_on(FileStorage::new(&path).load());
        assert!(matches!(result, Err(StorageError::Serialization(_))));

        fs::write(&path, r#"{"version": 99, "shapes": []}"#).unwrap();
        let result = block_on(FileStorage::new(&path).load());
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("board.json"));

        block_on(storage.save(&sample())).unwrap();
        block_on(storage.save(&[])).unwrap();
        assert!(block_on(storage.load()).unwrap().is_empty());
    }
}
