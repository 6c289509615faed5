use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Artifact, ArtifactStore};
use crate::error::Result;

/// In-memory store keyed by the same paths a [`FileStore`](super::FileStore) would use
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<PathBuf, Artifact>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls served so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of stored artifacts
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A writer that panicked cannot leave an entry half inserted, so the
    /// map behind a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, Artifact>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, Artifact>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactStore for MemoryStore {
    fn has(&self, key: &Path) -> bool {
        self.read().contains_key(key)
    }

    fn get(&self, key: &Path) -> Result<Artifact> {
        self.read().get(key).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no artifact stored under {}", key.display()),
            )
            .into()
        })
    }

    fn put(&self, key: &Path, value: &Artifact) -> Result<()> {
        self.write().insert(key.to_path_buf(), value.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut keys: Vec<PathBuf> = self
            .read()
            .keys()
            .filter(|k| k.parent() == Some(dir))
            .filter(|k| k.extension().is_some_and(|ext| ext == "npy"))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
