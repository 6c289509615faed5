//! # combind - docked-pose feature computation and caching
//!
//! `combind` computes per-pose and pairwise features over ensembles of docked
//! ligand poses and caches them on disk, so that later scoring stages can
//! slice them by ligand without recomputation.
//!
//! ## Key Features
//!
//! - **Resumable extraction**: every artifact is keyed by a deterministic path
//!   and written only when absent; re-running a stage is a no-op.
//!
//! - **Per-pose features**: docking score, pose identity, RMSD to a reference
//!   structure and interaction fingerprints for every pose source.
//!
//! - **Pairwise features**: interaction-family similarity, shape similarity and
//!   substructure RMSD matrices, filled sequentially or on a worker pool with
//!   bit-identical results.
//!
//! - **Pluggable collaborators**: external tools sit behind narrow traits, and
//!   the artifact cache behind [`ArtifactStore`](store::ArtifactStore).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::path::PathBuf;
//!
//! use combind::prelude::*;
//!
//! let config = FeatureConfig::new("runs/2XYZ")
//!     .with_type_library("/opt/combind/features")
//!     .with_max_poses(100);
//! let mut features = Features::open(config, &ToolConfig::default())?;
//!
//! let pvs = vec![PathBuf::from("runs/2XYZ/docking/LIG1-to-2XYZ.sdf.gz")];
//! let natives = HashMap::from([(
//!     "LIG1".to_string(),
//!     PathBuf::from("structures/ligands/LIG1.sdf"),
//! )]);
//!
//! features.compute_single_features(&pvs, &natives)?;
//! let report = features.compute_pair_features(&pvs, None, PairFeatureSet::default(), 4)?;
//! assert!(report.is_success());
//!
//! let view = features.get_view(&["LIG1"], &["shape"])?;
//! println!("{} poses", view.gscore["LIG1"].len());
//! # Ok::<(), combind::error::FeatureError>(())
//! ```
//!
//! This produces:
//! ```text
//! runs/2XYZ/
//! ├── docking/LIG1-to-2XYZ.sdf.gz
//! ├── docking/LIG1-to-2XYZ_{gscore,name,rmsd}.npy
//! ├── docking/LIG1-to-2XYZ_ifp_rd1.csv
//! ├── {rmsd,gscore,name}1.npy
//! └── {hbond,saltbridge,contact,shape,mcss}.npy
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dock;
pub mod error;
pub mod features;
pub mod ifp;
pub mod partition;
pub mod paths;
pub mod pose;
pub mod store;
pub mod tools;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigFile, FeatureConfig, IfpSettings, ToolConfig};
    pub use crate::dock::DockLine;
    pub use crate::error::{FeatureError, Result};
    pub use crate::features::{
        select_poses, FeatureView, Features, PairFeatureSet, PairReport, PoseCollection,
        SingleFeatureStats,
    };
    pub use crate::ifp::IfpRecord;
    pub use crate::partition::Partition;
    pub use crate::paths::{ArtifactName, PathResolver};
    pub use crate::pose::{Pose, PoseId, PoseReader};
    pub use crate::store::{Artifact, ArtifactStore, FileStore, MemoryStore};
    pub use crate::tools::Toolbox;
}
