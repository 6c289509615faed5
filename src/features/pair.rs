use std::path::PathBuf;

use log::{debug, error, info};
use ndarray::Array2;

use super::{Features, PairReport, PoseCollection};
use crate::error::{FeatureError, Result};
use crate::partition::Partition;
use crate::store::Artifact;

/// Which pairwise families to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairFeatureSet {
    /// One matrix per configured interaction family
    pub ifp: bool,
    /// Shape similarity
    pub shape: bool,
    /// Substructure RMSD
    pub mcss: bool,
}

impl Default for PairFeatureSet {
    fn default() -> Self {
        Self {
            ifp: true,
            shape: true,
            mcss: true,
        }
    }
}

impl Features {
    /// Compute pairwise feature matrices between two pose collections.
    ///
    /// When `pvs2` is `None` the collection is compared with itself. The merged
    /// `rmsd1`, `gscore1` and `name1` arrays are always (re)written; the `*2`
    /// arrays only for a distinct second collection. Each family is computed
    /// only when its matrix is absent, and a failing family does not stop the
    /// others.
    ///
    /// `processes > 1` fills matrices on a worker pool of that size.
    pub fn compute_pair_features(
        &self,
        pvs: &[PathBuf],
        pvs2: Option<&[PathBuf]>,
        which: PairFeatureSet,
        processes: usize,
    ) -> Result<PairReport> {
        let first = self.load_single_features(pvs, None)?;
        self.put_collection(&first, "1")?;

        let loaded;
        let second = match pvs2 {
            Some(pvs2) => {
                loaded = self.load_single_features(pvs2, None)?;
                self.put_collection(&loaded, "2")?;
                &loaded
            }
            None => &first,
        };

        let partition = Partition::from_processes(processes);
        let mut report = PairReport::default();

        if which.ifp {
            for family in &self.config.ifp_features {
                info!("Computing {family} similarities.");
                self.run_family(&mut report, family, || {
                    self.ifp_matrix(&first, second, family, partition)
                });
            }
        }

        if which.shape {
            info!("Computing shape similarities.");
            self.run_family(&mut report, "shape", || {
                self.shape_matrix(&first, second, partition)
            });
        }

        if which.mcss {
            info!("Computing substructure RMSDs.");
            self.run_family(&mut report, "mcss", || {
                self.mcss_matrix(&first, second, partition)
            });
        }

        Ok(report)
    }

    /// Persist merged per-pose arrays; an identical cached array is left untouched
    fn put_collection(&self, collection: &PoseCollection, suffix: &str) -> Result<()> {
        let arrays = [
            ("rmsd", Artifact::Vector(collection.rmsd.clone())),
            ("gscore", Artifact::Vector(collection.gscore.clone())),
            ("name", Artifact::Names(collection.names.clone())),
        ];
        for (name, value) in arrays {
            let key = self.path(&format!("{name}{suffix}"), None)?;
            if self.store.has(&key) && self.store.get(&key)? == value {
                debug!("Unchanged: {}", key.display());
                continue;
            }
            self.store.put(&key, &value)?;
        }
        Ok(())
    }

    /// Compute one family unless cached; any failure goes to the report
    fn run_family<F>(&self, report: &mut PairReport, name: &str, compute: F)
    where
        F: FnOnce() -> Result<Array2<f64>>,
    {
        let outcome = self.path(name, None).and_then(|out| {
            if self.store.has(&out) {
                debug!("Cached: {}", out.display());
                return Ok(false);
            }
            let matrix = compute()?;
            self.store.put(&out, &Artifact::Matrix(matrix))?;
            Ok(true)
        });
        match outcome {
            Ok(true) => report.computed.push(name.to_string()),
            Ok(false) => report.cached.push(name.to_string()),
            Err(e) => {
                error!("Pair feature {name} failed: {e}");
                report.failed.push((name.to_string(), e));
            }
        }
    }

    fn ifp_matrix(
        &self,
        first: &PoseCollection,
        second: &PoseCollection,
        family: &str,
        partition: Partition,
    ) -> Result<Array2<f64>> {
        let interaction = self.tools.interaction.as_ref();
        partition.fill(first.len(), second.len(), |i, j| {
            interaction.similarity(&first.ifps[i], &second.ifps[j], family)
        })
    }

    /// Shape is evaluated with the second collection as the first argument,
    /// then transposed so rows still index the first collection.
    fn shape_matrix(
        &self,
        first: &PoseCollection,
        second: &PoseCollection,
        partition: Partition,
    ) -> Result<Array2<f64>> {
        let shape = self.tools.shape.as_ref();
        let transposed = partition.fill(second.len(), first.len(), |i, j| {
            shape.similarity(&second.poses[i], &first.poses[j])
        })?;
        Ok(transposed.reversed_axes().as_standard_layout().into_owned())
    }

    fn mcss_matrix(
        &self,
        first: &PoseCollection,
        second: &PoseCollection,
        partition: Partition,
    ) -> Result<Array2<f64>> {
        let substructure = self.tools.substructure.as_deref().ok_or_else(|| {
            FeatureError::MissingConfig("type_library is not set".to_string())
        })?;
        partition.fill(first.len(), second.len(), |i, j| {
            substructure.rmsd(&first.poses[i], &second.poses[j])
        })
    }

    /// Whether a collection-scoped artifact is cached
    pub fn has_artifact(&self, name: &str) -> Result<bool> {
        Ok(self.store.has(&self.path(name, None)?))
    }
}
