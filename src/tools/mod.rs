//! # External collaborators
//!
//! The pipeline orchestrates metric providers it does not own. Each one is
//! consumed through a narrow trait so the orchestration can be exercised
//! with fakes:
//!
//! | Trait | Default | Role |
//! |-------|---------|------|
//! | [`RmsdTool`] | [`ObRms`] | RMSD of every pose to a reference structure |
//! | [`FingerprintEngine`] | [`CommandFingerprintEngine`] | per-pose interaction fingerprints |
//! | [`InteractionSimilarity`] | [`WeightedTanimoto`] | similarity of two fingerprints for one interaction family |
//! | [`ShapeSimilarity`] | [`GaussianShape`] | 3-D shape similarity of two poses |
//! | [`SubstructureRmsd`] | [`TypedAtomRmsd`] | RMSD over the common substructure of two poses |
//!
//! Pairwise providers are evaluated one cell at a time so that the
//! [`Partition`](crate::partition::Partition) strategy alone decides how the
//! matrix is split across workers.

use std::path::Path;

use crate::config::{FeatureConfig, IfpSettings, ToolConfig};
use crate::error::Result;
use crate::ifp::IfpRecord;
use crate::pose::Pose;

mod fingerprint;
mod mcss;
mod obrms;
mod shape;
mod similarity;

pub use fingerprint::CommandFingerprintEngine;
pub use mcss::{AtomTypes, TypedAtomRmsd};
pub use obrms::{parse_rmsd_output, ObRms};
pub use shape::GaussianShape;
pub use similarity::WeightedTanimoto;

/// Geometry-comparison tool computing RMSD to a reference structure
pub trait RmsdTool: Send + Sync {
    /// RMSD of each pose in `poses` to `reference`, first symmetry match only.
    ///
    /// Any failure of the tool itself must surface as
    /// [`FeatureError::ExternalTool`](crate::error::FeatureError::ExternalTool).
    fn rmsd_to_reference(&self, reference: &Path, poses: &Path) -> Result<Vec<f64>>;
}

/// Interaction-fingerprint engine
pub trait FingerprintEngine: Send + Sync {
    /// Fingerprint rows for the first `max_poses` poses of `poses`
    fn fingerprint(
        &self,
        settings: &IfpSettings,
        poses: &Path,
        max_poses: usize,
    ) -> Result<Vec<IfpRecord>>;
}

/// Similarity of two per-pose fingerprints within one interaction family
pub trait InteractionSimilarity: Send + Sync {
    /// Similarity of `a` and `b` restricted to rows of `family`
    fn similarity(&self, a: &[IfpRecord], b: &[IfpRecord], family: &str) -> f64;
}

/// 3-D shape similarity of two poses
pub trait ShapeSimilarity: Send + Sync {
    /// Similarity of `a` and `b`
    fn similarity(&self, a: &Pose, b: &Pose) -> f64;
}

/// RMSD over the common substructure of two poses
pub trait SubstructureRmsd: Send + Sync {
    /// RMSD between `a` and `b`
    fn rmsd(&self, a: &Pose, b: &Pose) -> f64;
}

/// The set of providers a [`Features`](crate::features::Features) instance uses
pub struct Toolbox {
    /// RMSD-to-reference tool
    pub rmsd: Box<dyn RmsdTool>,
    /// Fingerprint engine
    pub fingerprint: Box<dyn FingerprintEngine>,
    /// Interaction similarity
    pub interaction: Box<dyn InteractionSimilarity>,
    /// Shape similarity
    pub shape: Box<dyn ShapeSimilarity>,
    /// Substructure RMSD, unset without a type library
    pub substructure: Option<Box<dyn SubstructureRmsd>>,
}

impl Toolbox {
    /// Default providers for a validated configuration
    pub fn from_config(config: &FeatureConfig, tools: &ToolConfig) -> Result<Self> {
        let types = AtomTypes::from_file(&config.mcss_type_file()?)?;
        Ok(Self::without_type_library(config, tools)?
            .with_substructure_rmsd(TypedAtomRmsd::new(types)))
    }

    /// Default providers that need no type library; substructure RMSD is left unset
    pub fn without_type_library(config: &FeatureConfig, tools: &ToolConfig) -> Result<Self> {
        Ok(Self {
            rmsd: Box::new(ObRms::new(&tools.obrms)),
            fingerprint: Box::new(CommandFingerprintEngine::new(&tools.fingerprint)),
            interaction: Box::new(WeightedTanimoto),
            shape: Box::new(GaussianShape::for_version(&config.shape_version)?),
            substructure: None,
        })
    }

    /// Replace the RMSD tool
    pub fn with_rmsd_tool(mut self, tool: impl RmsdTool + 'static) -> Self {
        self.rmsd = Box::new(tool);
        self
    }

    /// Replace the fingerprint engine
    pub fn with_fingerprint_engine(mut self, engine: impl FingerprintEngine + 'static) -> Self {
        self.fingerprint = Box::new(engine);
        self
    }

    /// Replace the interaction-similarity provider
    pub fn with_interaction_similarity(
        mut self,
        provider: impl InteractionSimilarity + 'static,
    ) -> Self {
        self.interaction = Box::new(provider);
        self
    }

    /// Replace the shape provider
    pub fn with_shape_similarity(mut self, provider: impl ShapeSimilarity + 'static) -> Self {
        self.shape = Box::new(provider);
        self
    }

    /// Replace the substructure-RMSD provider
    pub fn with_substructure_rmsd(mut self, provider: impl SubstructureRmsd + 'static) -> Self {
        self.substructure = Some(Box::new(provider));
        self
    }
}
