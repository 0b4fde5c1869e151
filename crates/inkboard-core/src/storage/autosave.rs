//! Auto-save functionality for board persistence.
//!
//! Two flavors: [`spawn_autosave`] runs on a tokio runtime and follows the
//! whiteboard's change notifications; [`AutoSaveManager`] is polled by hosts
//! that drive their own frame loop.

use crate::history::Snapshot;
use crate::shapes::Shape;
use crate::state::DocumentState;
use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Quiet period after the last change before shapes are written.
pub const DEFAULT_AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(2);

/// Persist committed shapes after every quiet period of `debounce`.
///
/// Each new state restarts the timer. Shapes are only written when the list
/// differs from the last successful save, so viewport or tool changes never
/// hit storage. Failed saves are logged and retried after the next change.
/// The task never touches the document and exits once the whiteboard is
/// dropped, flushing a pending change first.
pub fn spawn_autosave<S>(
    storage: Arc<S>,
    mut rx: watch::Receiver<Arc<DocumentState>>,
    debounce: Duration,
) -> JoinHandle<()>
where
    S: Storage + ?Sized + 'static,
{
    let mut saved: Snapshot = Arc::clone(&rx.borrow_and_update().shapes);

    tokio::spawn(async move {
        loop {
            if rx.changed().await.is_err() {
                break;
            }

            let closed = loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break true;
                        }
                    }
                    () = tokio::time::sleep(debounce) => break false,
                }
            };

            let shapes = Arc::clone(&rx.borrow_and_update().shapes);
            if !Arc::ptr_eq(&shapes, &saved) {
                match save_blocking(&storage, &shapes).await {
                    Ok(()) => {
                        log::debug!("Autosaved {} shapes", shapes.len());
                        saved = shapes;
                    }
                    Err(e) => log::warn!("Autosave failed: {}", e),
                }
            }

            if closed {
                break;
            }
        }
        log::trace!("Autosave task finished");
    })
}

/// Run one save on the blocking pool.
///
/// Backends such as [`FileStorage`](super::FileStorage) do synchronous I/O
/// inside their futures, which must not run on a runtime worker thread.
async fn save_blocking<S>(storage: &Arc<S>, shapes: &Snapshot) -> StorageResult<()>
where
    S: Storage + ?Sized + 'static,
{
    let storage = Arc::clone(storage);
    let shapes = Arc::clone(shapes);
    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || runtime.block_on(storage.save(&shapes)))
        .await
        .map_err(|e| StorageError::Other(format!("Autosave task failed: {}", e)))?
}

/// Poll-driven autosave.
///
/// Call [`mark_changed`](Self::mark_changed) on every edit and
/// [`maybe_save`](Self::maybe_save) once per frame.
pub struct AutoSaveManager<S: Storage + ?Sized> {
    /// Storage backend.
    storage: Arc<S>,
    debounce: Duration,
    /// Time of the most recent change.
    last_change: Option<Instant>,
    /// Whether the board has unsaved changes.
    dirty: bool,
}

impl<S: Storage + ?Sized> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            debounce: DEFAULT_AUTOSAVE_DEBOUNCE,
            last_change: None,
            dirty: false,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record an edit; restarts the quiet period.
    pub fn mark_changed(&mut self) {
        self.dirty = true;
        self.last_change = Some(Instant::now());
    }

    /// Check if the board has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dirty and quiet for at least the debounce period.
    pub fn should_save(&self) -> bool {
        self.dirty
            && self
                .last_change
                .is_some_and(|last| last.elapsed() >= self.debounce)
    }

    /// Save if [`should_save`](Self::should_save). Returns true if a save
    /// happened.
    pub async fn maybe_save(&mut self, shapes: &[Shape]) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }

        self.save(shapes).await?;
        Ok(true)
    }

    /// Force save immediately. The board stays dirty if the save fails.
    pub async fn save(&mut self, shapes: &[Shape]) -> StorageResult<()> {
        self.storage.save(shapes).await?;
        self.dirty = false;
        Ok(())
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
