use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::SubstructureRmsd;
use crate::error::{FeatureError, Result};
use crate::pose::{Atom, Pose};

/// Element → atom-type table read from a `.typ` type library file.
///
/// One `ELEMENT TYPE` pair per line; `#` starts a comment. Elements not
/// listed (typically hydrogens) take no part in substructure matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomTypes {
    types: HashMap<String, String>,
}

impl AtomTypes {
    /// Read a type library file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FeatureError::MissingConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Parse type library text
    pub fn parse(text: &str) -> Result<Self> {
        let mut types = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut cols = line.split_whitespace();
            match (cols.next(), cols.next(), cols.next()) {
                (Some(element), Some(atom_type), None) => {
                    types.insert(element.to_string(), atom_type.to_string());
                }
                _ => {
                    return Err(FeatureError::MissingConfig(format!(
                        "malformed type library line {}: {line:?}",
                        i + 1
                    )))
                }
            }
        }
        Ok(Self { types })
    }

    /// Type of an element, if it is typed at all
    pub fn type_of(&self, element: &str) -> Option<&str> {
        self.types.get(element).map(String::as_str)
    }

    fn group<'a>(&self, pose: &'a Pose) -> BTreeMap<&str, Vec<&'a Atom>> {
        let mut groups: BTreeMap<&str, Vec<&Atom>> = BTreeMap::new();
        for atom in &pose.atoms {
            if let Some(t) = self.type_of(&atom.element) {
                groups.entry(t).or_default().push(atom);
            }
        }
        groups
    }
}

/// In-place RMSD over typed atoms matched greedily by distance.
///
/// Both poses share the receptor frame, so no superposition is done. Within
/// each atom type, the closest not-yet-matched pairs are taken first. Pose
/// pairs with no matchable atoms get `+inf`.
#[derive(Debug, Clone)]
pub struct TypedAtomRmsd {
    types: AtomTypes,
}

impl TypedAtomRmsd {
    /// Match atoms according to `types`
    pub fn new(types: AtomTypes) -> Self {
        Self { types }
    }
}

impl SubstructureRmsd for TypedAtomRmsd {
    fn rmsd(&self, a: &Pose, b: &Pose) -> f64 {
        let groups_a = self.types.group(a);
        let groups_b = self.types.group(b);

        let mut sum_sq = 0.0;
        let mut matched = 0usize;
        for (atom_type, atoms_a) in &groups_a {
            let Some(atoms_b) = groups_b.get(atom_type) else {
                continue;
            };

            let mut pairs: Vec<(f64, usize, usize)> = Vec::with_capacity(atoms_a.len() * atoms_b.len());
            for (i, x) in atoms_a.iter().enumerate() {
                for (j, y) in atoms_b.iter().enumerate() {
                    pairs.push((x.distance_sq(y), i, j));
                }
            }
            pairs.sort_by(|p, q| p.0.total_cmp(&q.0).then(p.1.cmp(&q.1)).then(p.2.cmp(&q.2)));

            let mut used_a = vec![false; atoms_a.len()];
            let mut used_b = vec![false; atoms_b.len()];
            for (d2, i, j) in pairs {
                if used_a[i] || used_b[j] {
                    continue;
                }
                used_a[i] = true;
                used_b[j] = true;
                sum_sq += d2;
                matched += 1;
            }
        }

        if matched == 0 {
            f64::INFINITY
        } else {
            (sum_sq / matched as f64).sqrt()
        }
    }
}
