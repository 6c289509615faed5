use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ndarray::Array1;

use super::{absolute, Features};
use crate::error::{FeatureError, Result};
use crate::pose::{self, PoseId, PoseReader};
use crate::store::Artifact;

/// Sentinel RMSD for poses without a usable reference structure
pub const RMSD_SENTINEL: f64 = -1.0;

/// Statistics from a single-feature run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleFeatureStats {
    /// Distinct pose sources processed
    pub sources: usize,
    /// Artifacts written
    pub computed: usize,
    /// Artifacts already present
    pub cached: usize,
    /// Sources whose RMSDs fell back to sentinels
    pub rmsd_fallbacks: usize,
}

impl Features {
    /// Compute and cache score, name, RMSD and fingerprint artifacts for every
    /// pose source. Each artifact is only computed when absent.
    ///
    /// `natives` maps a ligand name to its reference structure.
    pub fn compute_single_features<P: AsRef<Path>>(
        &self,
        pvs: &[P],
        natives: &HashMap<String, PathBuf>,
    ) -> Result<SingleFeatureStats> {
        let mut unique: Vec<PathBuf> = Vec::with_capacity(pvs.len());
        for pv in pvs {
            let pv = absolute(pv.as_ref())?;
            if !unique.contains(&pv) {
                unique.push(pv);
            }
        }

        let mut stats = SingleFeatureStats {
            sources: unique.len(),
            ..Default::default()
        };

        info!("Extracting docking scores.");
        for pv in &unique {
            let out = self.path("gscore", Some(pv))?;
            if self.cached(&out, &mut stats) {
                continue;
            }
            self.compute_gscore(pv, &out)?;
            stats.computed += 1;
        }

        info!("Extracting names.");
        for pv in &unique {
            let out = self.path("name", Some(pv))?;
            if self.cached(&out, &mut stats) {
                continue;
            }
            self.compute_name(pv, &out)?;
            stats.computed += 1;
        }

        info!("Computing RMSDs to reference poses.");
        for pv in &unique {
            let out = self.path("rmsd", Some(pv))?;
            if self.cached(&out, &mut stats) {
                continue;
            }
            if !self.compute_rmsd(pv, natives, &out)? {
                stats.rmsd_fallbacks += 1;
            }
            stats.computed += 1;
        }

        info!("Computing interaction fingerprints.");
        for pv in &unique {
            let out = self.path("ifp", Some(pv))?;
            if self.cached(&out, &mut stats) {
                continue;
            }
            self.compute_ifp(pv, &out)?;
            stats.computed += 1;
        }

        info!(
            "Single features: {} sources, {} computed, {} cached",
            stats.sources, stats.computed, stats.cached
        );
        Ok(stats)
    }

    /// [`compute_single_features`](Self::compute_single_features) over grouped
    /// pose sources; the grouping is flattened first.
    pub fn compute_single_features_grouped<P: AsRef<Path>>(
        &self,
        groups: &[Vec<P>],
        natives: &HashMap<String, PathBuf>,
    ) -> Result<SingleFeatureStats> {
        let flat: Vec<&Path> = groups
            .iter()
            .flat_map(|group| group.iter().map(AsRef::as_ref))
            .collect();
        self.compute_single_features(&flat, natives)
    }

    fn cached(&self, out: &Path, stats: &mut SingleFeatureStats) -> bool {
        let hit = self.store.has(out);
        if hit {
            debug!("Cached: {}", out.display());
            stats.cached += 1;
        }
        hit
    }

    /// Docking score of the first `max_poses` poses
    pub(super) fn compute_gscore(&self, pv: &Path, out: &Path) -> Result<()> {
        let property = &self.config.score_property;
        let mut scores = Vec::new();
        for (i, pose) in PoseReader::open(pv)?.take(self.config.max_poses).enumerate() {
            let score = pose?.float_property(property).ok_or_else(|| {
                FeatureError::MissingProperty {
                    pv: pv.to_path_buf(),
                    pose: i,
                    property: property.clone(),
                }
            })?;
            scores.push(score);
        }
        self.store.put(out, &Artifact::Vector(Array1::from(scores)))
    }

    /// `<ligand>_<rank>-to-<structure>` identity of the first `max_poses` poses
    pub(super) fn compute_name(&self, pv: &Path, out: &Path) -> Result<()> {
        let docked_to = pose::docked_to(pv).to_string();
        let mut ranks: HashMap<String, usize> = HashMap::new();
        let mut names = Vec::new();
        for pose in PoseReader::open(pv)?.take(self.config.max_poses) {
            let ligand = pose?.title;
            let rank = ranks.entry(ligand.clone()).or_insert(0);
            names.push(
                PoseId {
                    ligand,
                    rank: *rank,
                    docked_to: docked_to.clone(),
                }
                .to_string(),
            );
            *rank += 1;
        }
        self.store.put(out, &Artifact::Names(names))
    }

    /// RMSD of each pose to the ligand's reference structure.
    ///
    /// Returns `false` when sentinels were stored instead of tool output.
    pub(super) fn compute_rmsd(
        &self,
        pv: &Path,
        natives: &HashMap<String, PathBuf>,
        out: &Path,
    ) -> Result<bool> {
        let ligand = pose::source_ligand(pv);
        let (rmsds, measured) = match natives.get(ligand) {
            Some(native) => match self.rmsd_to_reference(native, pv) {
                Ok(rmsds) => (rmsds, true),
                Err(e @ FeatureError::ExternalTool { .. }) => {
                    warn!("RMSD failed for {ligand}: {e}");
                    (self.sentinel_rmsds(), false)
                }
                Err(e) => return Err(e),
            },
            None => {
                warn!("No reference structure for {ligand}; storing sentinel RMSDs");
                (self.sentinel_rmsds(), false)
            }
        };
        self.store.put(out, &Artifact::Vector(rmsds))?;
        Ok(measured)
    }

    fn sentinel_rmsds(&self) -> Array1<f64> {
        Array1::from_elem(self.config.max_poses, RMSD_SENTINEL)
    }

    /// Tool RMSDs capped at `max_poses`; too few values counts as a tool failure
    fn rmsd_to_reference(&self, native: &Path, pv: &Path) -> Result<Array1<f64>> {
        let mut rmsds = self.tools.rmsd.rmsd_to_reference(native, pv)?;
        let expected = PoseReader::open(pv)?.take(self.config.max_poses).count();
        if rmsds.len() < expected {
            return Err(FeatureError::ExternalTool {
                tool: "rmsd".to_string(),
                target: pv.display().to_string(),
                reason: format!("returned {} RMSDs for {expected} poses", rmsds.len()),
            });
        }
        rmsds.truncate(self.config.max_poses);
        Ok(Array1::from(rmsds))
    }

    /// Interaction fingerprint table of the first `max_poses` poses
    pub(super) fn compute_ifp(&self, pv: &Path, out: &Path) -> Result<()> {
        let settings = self.config.ifp_settings()?;
        let rows = self
            .tools
            .fingerprint
            .fingerprint(&settings, pv, self.config.max_poses)?;
        self.store.put(out, &Artifact::Interactions(rows))
    }
}
