//! Deterministic artifact paths.
//!
//! Per-source artifacts sit next to their pose source (or under
//! `<root>/single` when pose sources live outside `<root>/docking`):
//!
//! ```text
//! docking/LIG1-to-2XYZ.sdf.gz
//! docking/LIG1-to-2XYZ_gscore.npy
//! docking/LIG1-to-2XYZ_name.npy
//! docking/LIG1-to-2XYZ_rmsd.npy
//! docking/LIG1-to-2XYZ_ifp_rd1.csv
//! ```
//!
//! Collection-scoped artifacts sit directly under the analysis root as
//! `<name>.npy` (`shape.npy`, `mcss.npy`, `hbond.npy`, `name1.npy`, ...).

use std::path::{Path, PathBuf};

use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};

const POSE_SOURCE_EXTENSIONS: &[&str] = &[".sdf.gz", ".sdf"];

/// Logical artifact names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactName<'a> {
    /// Per-pose RMSD to the reference structure
    Rmsd,
    /// Per-pose docking score
    Gscore,
    /// Per-pose identity strings
    Name,
    /// Interaction-fingerprint table
    Ifp,
    /// Shape-similarity matrix
    Shape,
    /// Substructure-RMSD matrix
    Mcss,
    /// Any other collection-scoped array (`name1`, `hbond`, ...)
    Other(&'a str),
}

impl<'a> ArtifactName<'a> {
    /// Map a logical name string to its artifact kind
    pub fn parse(name: &'a str) -> Self {
        match name {
            "rmsd" => Self::Rmsd,
            "gscore" => Self::Gscore,
            "name" => Self::Name,
            "ifp" => Self::Ifp,
            "shape" => Self::Shape,
            "mcss" => Self::Mcss,
            other => Self::Other(other),
        }
    }

    /// Whether the artifact belongs to a single pose source
    pub fn is_per_source(&self) -> bool {
        matches!(self, Self::Rmsd | Self::Gscore | Self::Name | Self::Ifp)
    }
}

/// Pure mapping from `(name, pose source)` to artifact path
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    pv_root: PathBuf,
    single_root: Option<PathBuf>,
    ifp_version: String,
}

impl PathResolver {
    /// Build a resolver from a feature configuration
    ///
    /// Relative roots are made absolute so they compare equal to the
    /// absolute pose-source paths the pipeline works with.
    pub fn new(config: &FeatureConfig) -> Self {
        let root = absolute_or_same(&config.root);
        let default_pv_root = root.join("docking");
        let pv_root = config
            .pv_root
            .as_deref()
            .map(absolute_or_same)
            .unwrap_or_else(|| default_pv_root.clone());
        let single_root = (pv_root != default_pv_root).then(|| root.join("single"));
        Self {
            root,
            pv_root,
            single_root,
            ifp_version: config.ifp_version.clone(),
        }
    }

    /// Analysis root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical artifact name.
    ///
    /// Per-source names (`rmsd`, `gscore`, `name`, `ifp`) require `pv`;
    /// every other name resolves to `<root>/<name>.npy` and ignores it.
    pub fn resolve(&self, name: &str, pv: Option<&Path>) -> Result<PathBuf> {
        let kind = ArtifactName::parse(name);
        if !kind.is_per_source() {
            return self.collection(name);
        }
        let pv = pv.ok_or_else(|| {
            FeatureError::InvalidArtifactName(format!("{name} requires a pose source"))
        })?;
        let suffix = match kind {
            ArtifactName::Rmsd => "_rmsd.npy".to_string(),
            ArtifactName::Gscore => "_gscore.npy".to_string(),
            ArtifactName::Name => "_name.npy".to_string(),
            _ => format!("_ifp_{}.csv", self.ifp_version),
        };
        self.per_source(pv, &suffix)
    }

    fn collection(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(FeatureError::InvalidArtifactName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.npy")))
    }

    fn per_source(&self, pv: &Path, suffix: &str) -> Result<PathBuf> {
        let pv = self.relocate(pv);
        let file_name = pv
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FeatureError::InvalidPoseSource(pv.display().to_string()))?;
        let stem = POSE_SOURCE_EXTENSIONS
            .iter()
            .find_map(|ext| file_name.strip_suffix(*ext))
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                FeatureError::InvalidPoseSource(format!(
                    "{} does not end in .sdf.gz or .sdf",
                    pv.display()
                ))
            })?;
        Ok(pv.with_file_name(format!("{stem}{suffix}")))
    }

    /// Move a pose source under `<root>/single` when pose sources are kept elsewhere
    fn relocate(&self, pv: &Path) -> PathBuf {
        match &self.single_root {
            Some(single_root) => match pv.strip_prefix(&self.pv_root) {
                Ok(relative) => single_root.join(relative),
                Err(_) => pv.to_path_buf(),
            },
            None => pv.to_path_buf(),
        }
    }
}

fn absolute_or_same(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
