//! # Docked poses
//!
//! A pose source is a gzip-compressed SDF file holding the docked poses of
//! one or more ligands, each ligand's poses contiguous and best first. This
//! module provides:
//!
//! - [`Pose`]: one read-only 3-D structure with its title and data items
//! - [`PoseId`]: the `<ligand>_<rank>-to-<structure>` identity persisted in
//!   name arrays
//! - [`PoseReader`]: a forward-only streaming reader over a pose source
//!
//! ```text
//! LIG1-to-2XYZ.sdf.gz
//! ├── LIG1   (rank 0, best score)
//! ├── LIG1   (rank 1)
//! ├── ...
//! └── LIG2   (rank 0)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

mod sdf;


pub use sdf::PoseReader;

/// One atom of a pose
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol as written in the atom block
    pub element: String,
    /// Cartesian coordinates in Å
    pub position: [f64; 3],
}

impl Atom {
    /// Squared distance to another atom
    pub fn distance_sq(&self, other: &Atom) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Whether this atom is a hydrogen
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }
}

/// A docked pose
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    /// Title line of the SDF record (the ligand name)
    pub title: String,
    /// Atoms in file order
    pub atoms: Vec<Atom>,
    /// `> <KEY>` data items
    pub properties: HashMap<String, String>,
}

impl Pose {
    /// Raw value of a data item
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Data item parsed as a float
    pub fn float_property(&self, key: &str) -> Option<f64> {
        self.property(key).and_then(|v| v.trim().parse().ok())
    }

    /// Atoms excluding hydrogens
    pub fn heavy_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|a| !a.is_hydrogen())
    }
}

/// Identity of one pose: ligand, intra-ligand rank and docked-to structure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoseId {
    /// Ligand name (SDF title)
    pub ligand: String,
    /// 0-based rank among poses of the same ligand in file order
    pub rank: usize,
    /// Structure the ligand was docked to
    pub docked_to: String,
}

impl PoseId {
    /// Parse a persisted `<ligand>_<rank>-to-<structure>` string
    pub fn parse(s: &str) -> Option<Self> {
        let (head, docked_to) = s.rsplit_once("-to-")?;
        let (ligand, rank) = head.rsplit_once('_')?;
        Some(Self {
            ligand: ligand.to_string(),
            rank: rank.parse().ok()?,
            docked_to: docked_to.to_string(),
        })
    }

    /// Ligand component of a persisted identity; the whole string if it does not parse
    pub fn ligand_of(s: &str) -> &str {
        s.rsplit_once("-to-")
            .and_then(|(head, _)| head.rsplit_once('_'))
            .filter(|(_, rank)| rank.parse::<usize>().is_ok())
            .map(|(ligand, _)| ligand)
            .unwrap_or(s)
    }
}

impl fmt::Display for PoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}-to-{}", self.ligand, self.rank, self.docked_to)
    }
}

/// File name of a pose source up to its first `.`
fn file_stem_prefix(pv: &Path) -> &str {
    pv.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("")
}

/// Structure a pose source was docked to: the part after the last `-to-`
pub fn docked_to(pv: &Path) -> &str {
    let stem = file_stem_prefix(pv);
    stem.rsplit("-to-").next().unwrap_or(stem)
}

/// Ligand a pose source belongs to: its file name up to the first `-`
pub fn source_ligand(pv: &Path) -> &str {
    let name = pv.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.split('-').next().unwrap_or(name)
}
