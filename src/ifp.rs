//! Interaction-fingerprint tables.
//!
//! A fingerprint table holds one row per pose × interaction, as written by
//! the fingerprint engine:
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | pose | usize | 0-based pose index within the source |
//! | label | str | Interaction label, prefixed by its family (`hbond_donor`, `contact`, ...) |
//! | residue | str | Protein-side partner (chain:resname:resnum at residue level) |
//! | score | f64 | Interaction strength |

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of a fingerprint table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfpRecord {
    /// 0-based pose index within the pose source
    pub pose: usize,
    /// Interaction label
    pub label: String,
    /// Protein-side partner
    pub residue: String,
    /// Interaction strength
    pub score: f64,
}

impl IfpRecord {
    /// Whether this row belongs to an interaction family, either as the
    /// whole label or as its `<family>_` prefix
    pub fn is_family(&self, family: &str) -> bool {
        match self.label.strip_prefix(family) {
            Some(rest) => rest.is_empty() || rest.starts_with('_'),
            None => false,
        }
    }
}

/// Read a fingerprint table from CSV
pub fn read_table<R: Read>(reader: R) -> Result<Vec<IfpRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write a fingerprint table as CSV
pub fn write_table<W: Write>(writer: W, rows: &[IfpRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Split a table into `n_poses` per-pose groups indexed by the `pose` column.
///
/// Poses without any interaction get an empty group; rows whose pose index
/// is `>= n_poses` are dropped.
pub fn group_by_pose(rows: &[IfpRecord], n_poses: usize) -> Vec<Vec<IfpRecord>> {
    let mut groups = vec![Vec::new(); n_poses];
    for row in rows {
        if let Some(group) = groups.get_mut(row.pose) {
            group.push(row.clone());
        }
    }
    groups
}
