//! # Feature pipeline
//!
//! [`Features`] ties configuration, path resolution, the artifact store and
//! the external providers together. The stages run in a fixed order:
//!
//! ```text
//! pose sources ──► compute_single_features ──► per-source artifacts
//!                                                 │
//!                         load_single_features ◄──┘
//!                                  │
//!                         compute_pair_features ──► rmsd1/gscore1/name1[, *2]
//!                                                   hbond/saltbridge/contact
//!                                                   shape, mcss
//!                                                        │
//!                                         get_view ◄─────┘
//! ```
//!
//! Every artifact is written only when its key is absent, so each stage is
//! resumable and re-running it is a no-op.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{FeatureConfig, ToolConfig};
use crate::error::Result;
use crate::paths::PathResolver;
use crate::store::{Artifact, ArtifactStore, FileStore};
use crate::tools::Toolbox;

mod loader;
mod pair;
mod report;
mod single;
mod view;


pub use loader::{select_poses, PoseCollection, REQUIRED_INPUTS};
pub use pair::PairFeatureSet;
pub use report::PairReport;
pub use single::{SingleFeatureStats, RMSD_SENTINEL};
pub use view::FeatureView;

/// Feature computation and caching for one analysis root
pub struct Features {
    config: FeatureConfig,
    resolver: PathResolver,
    store: Arc<dyn ArtifactStore>,
    tools: Toolbox,
    raw: HashMap<String, Artifact>,
}

impl Features {
    /// Create a pipeline over an explicit store and provider set.
    ///
    /// The configuration is validated here, before any pose source is read.
    pub fn new(config: FeatureConfig, tools: Toolbox, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, tools, store))
    }

    /// Create a pipeline with the default providers and the on-disk store
    pub fn open(config: FeatureConfig, tool_config: &ToolConfig) -> Result<Self> {
        config.validate()?;
        let tools = Toolbox::from_config(&config, tool_config)?;
        Ok(Self::assemble(config, tools, Arc::new(FileStore::new())))
    }

    /// Read persisted artifacts under `config.root` without an extraction setup.
    ///
    /// Only the settings that determine artifact names are checked, so no
    /// type library is needed. Substructure RMSDs cannot be computed through
    /// the returned instance.
    pub fn viewer(config: FeatureConfig, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        config.validate_versions()?;
        let tools = Toolbox::without_type_library(&config, &ToolConfig::default())?;
        Ok(Self::assemble(config, tools, store))
    }

    fn assemble(config: FeatureConfig, tools: Toolbox, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            resolver: PathResolver::new(&config),
            config,
            store,
            tools,
            raw: HashMap::new(),
        }
    }

    /// The feature-set configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// The artifact store
    pub fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    /// Analysis root
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Resolve a logical artifact name (see [`PathResolver::resolve`])
    pub fn path(&self, name: &str, pv: Option<&Path>) -> Result<PathBuf> {
        self.resolver.resolve(name, pv)
    }
}

/// Absolute form of a pose-source path, without resolving symlinks
fn absolute(pv: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(pv)?)
}
