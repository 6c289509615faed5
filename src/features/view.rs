use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use ndarray::{Array1, Array2, Axis};

use super::Features;
use crate::error::{FeatureError, Result};
use crate::pose::PoseId;
use crate::store::Artifact;

/// Per-ligand slices of the cached collection arrays.
///
/// Pair matrices are keyed by feature name, then by `(row ligand, column
/// ligand)` with `row < column` in the order the ligands were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureView {
    /// Docking scores per ligand
    pub gscore: BTreeMap<String, Array1<f64>>,
    /// RMSDs to the reference structure per ligand
    pub rmsd: BTreeMap<String, Array1<f64>>,
    /// Pair-feature blocks per feature and ligand pair
    pub pairs: BTreeMap<String, BTreeMap<(String, String), Array2<f64>>>,
}

impl FeatureView {
    /// Block of `feature` between two ligands, if present
    pub fn pair(&self, feature: &str, a: &str, b: &str) -> Option<&Array2<f64>> {
        self.pairs
            .get(feature)?
            .get(&(a.to_string(), b.to_string()))
    }
}

impl Features {
    /// (Re)load every collection-scoped `.npy` artifact under the root,
    /// keyed by file stem. Returns the number of artifacts loaded.
    pub fn load_features(&mut self) -> Result<usize> {
        let mut raw = HashMap::new();
        for key in self.store.list(self.resolver.root())? {
            let Some(stem) = key.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            debug!("Loading {}", key.display());
            raw.insert(stem.to_string(), self.store.get(&key)?);
        }
        info!("Loaded {} feature arrays", raw.len());
        self.raw = raw;
        Ok(self.raw.len())
    }

    /// Artifacts held by the last [`load_features`](Self::load_features)
    pub fn raw(&self) -> &HashMap<String, Artifact> {
        &self.raw
    }

    /// Slice the cached arrays by ligand.
    ///
    /// Arrays are loaded on first use and kept until the next explicit
    /// [`load_features`](Self::load_features). Every ligand must own at least
    /// one pose in `name1`. Every vector and feature matrix must have one
    /// entry per row and column of `name1`; cached matrices are never
    /// recomputed, so one left over from a smaller or two-collection run
    /// fails with `MisalignedArtifact`.
    pub fn get_view<S: AsRef<str>>(&mut self, ligands: &[S], features: &[S]) -> Result<FeatureView> {
        if self.raw.is_empty() {
            self.load_features()?;
        }

        let names = match self.raw.get("name1") {
            Some(Artifact::Names(names)) => names,
            Some(_) => {
                return Err(FeatureError::ArtifactKind {
                    path: self.path("name1", None)?,
                    expected: "name array",
                })
            }
            None => return Err(self.missing("name1")),
        };

        let mut masks: Vec<(&str, Vec<usize>)> = Vec::with_capacity(ligands.len());
        for ligand in ligands {
            let ligand = ligand.as_ref();
            let mask: Vec<usize> = names
                .iter()
                .enumerate()
                .filter(|(_, name)| PoseId::ligand_of(name) == ligand)
                .map(|(i, _)| i)
                .collect();
            if mask.is_empty() {
                return Err(FeatureError::MissingLigand(ligand.to_string()));
            }
            masks.push((ligand, mask));
        }

        let n = names.len();
        let gscore = self.vector("gscore1", n)?;
        let rmsd = self.vector("rmsd1", n)?;

        let mut view = FeatureView::default();
        for (ligand, mask) in &masks {
            view.gscore
                .insert(ligand.to_string(), gscore.select(Axis(0), mask));
            view.rmsd
                .insert(ligand.to_string(), rmsd.select(Axis(0), mask));
        }

        for feature in features {
            let feature = feature.as_ref();
            let matrix = self.matrix(feature, n)?;
            let mut blocks = BTreeMap::new();
            for (i, (li, mi)) in masks.iter().enumerate() {
                for (lj, mj) in &masks[i + 1..] {
                    let block = matrix.select(Axis(0), mi).select(Axis(1), mj);
                    blocks.insert((li.to_string(), lj.to_string()), block);
                }
            }
            view.pairs.insert(feature.to_string(), blocks);
        }
        Ok(view)
    }

    fn missing(&self, name: &str) -> FeatureError {
        FeatureError::MissingCache {
            artifact: name.to_string(),
            pv: self.resolver.root().to_path_buf(),
        }
    }

    fn vector(&self, name: &str, len: usize) -> Result<&Array1<f64>> {
        match self.raw.get(name) {
            Some(Artifact::Vector(v)) => {
                self.aligned(name, len, v.len())?;
                Ok(v)
            }
            Some(_) => Err(FeatureError::ArtifactKind {
                path: self.path(name, None)?,
                expected: "vector",
            }),
            None => Err(self.missing(name)),
        }
    }

    /// A `len` × `len` matrix
    fn matrix(&self, name: &str, len: usize) -> Result<&Array2<f64>> {
        match self.raw.get(name) {
            Some(Artifact::Matrix(m)) => {
                self.aligned(name, len, m.nrows())?;
                self.aligned(name, len, m.ncols())?;
                Ok(m)
            }
            Some(_) => Err(FeatureError::ArtifactKind {
                path: self.path(name, None)?,
                expected: "matrix",
            }),
            None => Err(self.missing(name)),
        }
    }

    fn aligned(&self, name: &str, expected: usize, found: usize) -> Result<()> {
        if found != expected {
            return Err(FeatureError::MisalignedArtifact {
                path: self.path(name, None)?,
                expected,
                found,
            });
        }
        Ok(())
    }
}
