//! # Feature store
//!
//! Cached artifacts are addressed by the path the [`PathResolver`] assigns
//! them. Presence of a key is the cache-hit signal; there is no manifest.
//! Two backends implement [`ArtifactStore`]:
//!
//! - [`FileStore`]: the on-disk layout (`.npy` arrays, `.csv` fingerprint tables)
//! - [`MemoryStore`]: a map keyed by the same paths, for tests and dry runs
//!
//! The store assumes a single writer. A `has` check followed by a `put` is
//! not atomic, so two extraction runs racing on one analysis root can leave
//! a duplicated or partially written artifact.
//!
//! [`PathResolver`]: crate::paths::PathResolver

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

use crate::error::{FeatureError, Result};
use crate::ifp::IfpRecord;

mod fs;
mod memory;
pub(crate) mod npy_str;


pub use fs::FileStore;
pub use memory::MemoryStore;

/// A cached value
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Per-pose scalars (scores, RMSDs)
    Vector(Array1<f64>),
    /// Per-pose identity strings
    Names(Vec<String>),
    /// Pairwise matrix, rows = collection 1, columns = collection 2
    Matrix(Array2<f64>),
    /// Interaction-fingerprint table
    Interactions(Vec<IfpRecord>),
}

impl Artifact {
    /// Short name of the value kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Names(_) => "name array",
            Self::Matrix(_) => "matrix",
            Self::Interactions(_) => "fingerprint table",
        }
    }

    /// Number of entries along the first axis
    pub fn len(&self) -> usize {
        match self {
            Self::Vector(v) => v.len(),
            Self::Names(n) => n.len(),
            Self::Matrix(m) => m.nrows(),
            Self::Interactions(rows) => rows.len(),
        }
    }

    /// Whether the artifact holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mismatch(path: &Path, expected: &'static str) -> FeatureError {
        FeatureError::ArtifactKind {
            path: path.to_path_buf(),
            expected,
        }
    }

    /// Unwrap a [`Artifact::Vector`]
    pub fn into_vector(self, path: &Path) -> Result<Array1<f64>> {
        match self {
            Self::Vector(v) => Ok(v),
            _ => Err(Self::mismatch(path, "vector")),
        }
    }

    /// Unwrap a [`Artifact::Names`]
    pub fn into_names(self, path: &Path) -> Result<Vec<String>> {
        match self {
            Self::Names(n) => Ok(n),
            _ => Err(Self::mismatch(path, "name array")),
        }
    }

    /// Unwrap a [`Artifact::Matrix`]
    pub fn into_matrix(self, path: &Path) -> Result<Array2<f64>> {
        match self {
            Self::Matrix(m) => Ok(m),
            _ => Err(Self::mismatch(path, "matrix")),
        }
    }

    /// Unwrap a [`Artifact::Interactions`]
    pub fn into_interactions(self, path: &Path) -> Result<Vec<IfpRecord>> {
        match self {
            Self::Interactions(rows) => Ok(rows),
            _ => Err(Self::mismatch(path, "fingerprint table")),
        }
    }
}

/// Cache of feature artifacts keyed by resolved path
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact exists under `key`
    fn has(&self, key: &Path) -> bool;

    /// Load the artifact stored under `key`
    fn get(&self, key: &Path) -> Result<Artifact>;

    /// Store an artifact under `key`, replacing any previous value
    fn put(&self, key: &Path, value: &Artifact) -> Result<()>;

    /// Keys of all `.npy` artifacts directly under `dir`, sorted
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Load a per-pose scalar array
    fn get_vector(&self, key: &Path) -> Result<Array1<f64>> {
        self.get(key)?.into_vector(key)
    }

    /// Load a name array
    fn get_names(&self, key: &Path) -> Result<Vec<String>> {
        self.get(key)?.into_names(key)
    }

    /// Load a pairwise matrix
    fn get_matrix(&self, key: &Path) -> Result<Array2<f64>> {
        self.get(key)?.into_matrix(key)
    }

    /// Load a fingerprint table
    fn get_interactions(&self, key: &Path) -> Result<Vec<IfpRecord>> {
        self.get(key)?.into_interactions(key)
    }
}
