use super::ShapeSimilarity;
use crate::error::{FeatureError, Result};
use crate::pose::{Atom, Pose};

/// Exponent of the pairwise atom overlap term `exp(-κ d²)`
const OVERLAP_EXPONENT: f64 = 0.3;

/// Tanimoto of atom-centred Gaussian overlap volumes, heavy atoms only.
///
/// With `typed` set (version `pharm_max`) only atoms of the same element
/// overlap; version `shape` lets every heavy atom pair overlap.
#[derive(Debug, Clone, Copy)]
pub struct GaussianShape {
    typed: bool,
}

impl GaussianShape {
    /// Provider for a configured shape version
    pub fn for_version(version: &str) -> Result<Self> {
        match version {
            "pharm_max" => Ok(Self { typed: true }),
            "shape" => Ok(Self { typed: false }),
            _ => Err(FeatureError::UnsupportedVersion {
                family: "shape",
                version: version.to_string(),
            }),
        }
    }

    fn overlap(&self, a: &[&Atom], b: &[&Atom]) -> f64 {
        let mut total = 0.0;
        for x in a {
            for y in b {
                if self.typed && x.element != y.element {
                    continue;
                }
                total += (-OVERLAP_EXPONENT * x.distance_sq(y)).exp();
            }
        }
        total
    }
}

impl ShapeSimilarity for GaussianShape {
    fn similarity(&self, a: &Pose, b: &Pose) -> f64 {
        let a: Vec<&Atom> = a.heavy_atoms().collect();
        let b: Vec<&Atom> = b.heavy_atoms().collect();

        let ab = self.overlap(&a, &b);
        let denominator = self.overlap(&a, &a) + self.overlap(&b, &b) - ab;
        if denominator > 0.0 {
            ab / denominator
        } else {
            0.0
        }
    }
}
