use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::Array1;

use super::{absolute, Features};
use crate::error::{FeatureError, Result};
use crate::ifp::{group_by_pose, IfpRecord};
use crate::pose::{Pose, PoseId, PoseReader};

/// Per-source artifacts the loader cannot compute itself, in the order they are checked.
///
/// Docking scores and names only need the pose source and are filled in on demand.
pub const REQUIRED_INPUTS: [&str; 2] = ["rmsd", "ifp"];

/// Aligned per-pose data for a collection of pose sources.
///
/// Entry `i` of every field describes the same pose.
#[derive(Debug, Clone, Default)]
pub struct PoseCollection {
    /// RMSD to the reference structure (`-1` when unknown)
    pub rmsd: Array1<f64>,
    /// Docking score
    pub gscore: Array1<f64>,
    /// Pose geometry
    pub poses: Vec<Pose>,
    /// `<ligand>_<rank>-to-<structure>` identities
    pub names: Vec<String>,
    /// Fingerprint rows, one group per pose, pose index rebased to the source
    pub ifps: Vec<Vec<IfpRecord>>,
}

impl PoseCollection {
    /// Number of poses
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the collection holds no poses
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Indices of the poses kept from one source.
///
/// A pose is kept when its ligand passes `ligands` (all ligands when `None`)
/// and fewer than `max_poses` earlier poses of the same source belong to the
/// same ligand. The result is ascending.
pub fn select_poses(names: &[String], ligands: Option<&HashSet<String>>, max_poses: usize) -> Vec<usize> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut keep = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let ligand = PoseId::ligand_of(name);
        let earlier = seen.entry(ligand).or_insert(0);
        let admitted = ligands.map_or(true, |set| set.contains(ligand));
        if admitted && *earlier < max_poses {
            keep.push(i);
        }
        *earlier += 1;
    }
    keep
}

/// Per-source arrays read from the store, before selection
struct SourceArtifacts {
    names: Vec<String>,
    gscore: Array1<f64>,
    rmsd: Array1<f64>,
    ifps: Vec<Vec<IfpRecord>>,
}

impl Features {
    /// Load cached single-pose features for `pvs` and concatenate them.
    ///
    /// Docking scores and names are computed on first use when absent; RMSDs
    /// and fingerprints must already be cached. `ligands` restricts the result
    /// to poses of the listed ligands.
    pub fn load_single_features<P: AsRef<Path>>(
        &self,
        pvs: &[P],
        ligands: Option<&[String]>,
    ) -> Result<PoseCollection> {
        let filter: Option<HashSet<String>> = ligands.map(|l| l.iter().cloned().collect());

        let mut rmsd = Vec::new();
        let mut gscore = Vec::new();
        let mut collection = PoseCollection::default();

        for pv in pvs {
            let pv = absolute(pv.as_ref())?;
            let source = self.load_source(&pv)?;
            let n = source.names.len();
            let mut poses = self.read_poses(&pv, n)?;
            let mut ifps = source.ifps;

            let keep = select_poses(&source.names, filter.as_ref(), self.config.max_poses);
            debug!("{}: keeping {} of {n} poses", pv.display(), keep.len());

            for i in keep {
                rmsd.push(source.rmsd[i]);
                gscore.push(source.gscore[i]);
                collection.poses.push(std::mem::take(&mut poses[i]));
                collection.names.push(source.names[i].clone());
                collection.ifps.push(std::mem::take(&mut ifps[i]));
            }
        }

        collection.rmsd = Array1::from(rmsd);
        collection.gscore = Array1::from(gscore);
        info!("Loaded {} poses from {} sources", collection.len(), pvs.len());
        Ok(collection)
    }

    /// Fail with `MissingCache` naming the first required artifact absent for `pv`
    pub(super) fn check_loader_inputs(&self, pv: &Path) -> Result<()> {
        for artifact in REQUIRED_INPUTS {
            if !self.store.has(&self.path(artifact, Some(pv))?) {
                return Err(FeatureError::MissingCache {
                    artifact: artifact.to_string(),
                    pv: pv.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    fn load_source(&self, pv: &Path) -> Result<SourceArtifacts> {
        self.check_loader_inputs(pv)?;

        let gscore_path = self.path("gscore", Some(pv))?;
        if !self.store.has(&gscore_path) {
            debug!("Computing missing docking scores for {}", pv.display());
            self.compute_gscore(pv, &gscore_path)?;
        }
        let name_path = self.path("name", Some(pv))?;
        if !self.store.has(&name_path) {
            debug!("Computing missing names for {}", pv.display());
            self.compute_name(pv, &name_path)?;
        }

        let names = self.store.get_names(&name_path)?;
        let n = names.len();

        let gscore = self.store.get_vector(&gscore_path)?;
        aligned(&gscore_path, n, gscore.len())?;

        let rmsd_path = self.path("rmsd", Some(pv))?;
        let rmsd = self.store.get_vector(&rmsd_path)?;
        aligned(&rmsd_path, n, rmsd.len())?;

        let ifp_path = self.path("ifp", Some(pv))?;
        let ifps = group_by_pose(&self.store.get_interactions(&ifp_path)?, n);

        Ok(SourceArtifacts {
            names,
            gscore,
            rmsd,
            ifps,
        })
    }

    fn read_poses(&self, pv: &Path, n: usize) -> Result<Vec<Pose>> {
        let poses = PoseReader::read_all(pv, Some(n))?;
        aligned(pv, n, poses.len())?;
        Ok(poses)
    }
}

fn aligned(path: &Path, expected: usize, found: usize) -> Result<()> {
    if found < expected {
        return Err(FeatureError::MisalignedArtifact {
            path: PathBuf::from(path),
            expected,
            found,
        });
    }
    Ok(())
}
