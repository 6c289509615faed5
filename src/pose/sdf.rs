//! Streaming reader for (gzip-compressed) SDF pose sources

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use super::{Atom, Pose};
use crate::error::{FeatureError, Result};

const RECORD_END: &str = "$$$$";

/// Forward-only reader yielding one [`Pose`] per SDF record
pub struct PoseReader<R: BufRead> {
    reader: R,
    path: PathBuf,
    record: usize,
    finished: bool,
}

impl PoseReader<Box<dyn BufRead>> {
    /// Open a pose source; `.gz` files are decompressed on the fly
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let gzipped = path.extension().is_some_and(|ext| ext == "gz");
        let reader: Box<dyn BufRead> = if gzipped {
            Box::new(BufReader::with_capacity(
                64 * 1024,
                MultiGzDecoder::new(file),
            ))
        } else {
            Box::new(BufReader::with_capacity(64 * 1024, file))
        };
        Ok(Self::new(reader, path))
    }

    /// Read up to `limit` poses (all of them when `None`)
    pub fn read_all<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Vec<Pose>> {
        let reader = Self::open(path)?;
        match limit {
            Some(n) => reader.take(n).collect(),
            None => reader.collect(),
        }
    }
}

impl<R: BufRead> PoseReader<R> {
    /// Wrap an already opened reader; `path` is only used in error messages
    pub fn new<P: AsRef<Path>>(reader: R, path: P) -> Self {
        Self {
            reader,
            path: path.as_ref().to_path_buf(),
            record: 0,
            finished: false,
        }
    }

    /// Read the next pose, `None` at end of input
    pub fn next_pose(&mut self) -> Result<Option<Pose>> {
        if self.finished {
            return Ok(None);
        }

        let mut lines: Vec<String> = Vec::new();
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                self.finished = true;
                break;
            }
            let line = buf.trim_end_matches(['\n', '\r']);
            if line.trim_end() == RECORD_END {
                break;
            }
            lines.push(line.to_string());
        }

        if lines.iter().all(|l| l.trim().is_empty()) {
            return Ok(None);
        }

        let pose = self.parse_record(&lines)?;
        self.record += 1;
        Ok(Some(pose))
    }

    fn error(&self, reason: impl Into<String>) -> FeatureError {
        FeatureError::Sdf {
            path: self.path.clone(),
            record: self.record,
            reason: reason.into(),
        }
    }

    fn parse_record(&self, lines: &[String]) -> Result<Pose> {
        // Header: title, program line, comment, counts line
        if lines.len() < 4 {
            return Err(self.error("not enough lines for an SDF header"));
        }

        let counts = &lines[3];
        if counts.contains("V3000") {
            return Err(self.error("V3000 records are not supported"));
        }
        let n_atoms = parse_count(counts, 0)
            .ok_or_else(|| self.error("could not parse atom count"))?;
        let n_bonds = parse_count(counts, 3)
            .ok_or_else(|| self.error("could not parse bond count"))?;

        let first_atom = 4;
        let end_atoms = first_atom + n_atoms;
        if lines.len() < end_atoms + n_bonds {
            return Err(self.error(format!(
                "declared {n_atoms} atoms and {n_bonds} bonds but record has {} lines",
                lines.len()
            )));
        }

        let mut atoms = Vec::with_capacity(n_atoms);
        for (i, line) in lines[first_atom..end_atoms].iter().enumerate() {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 {
                return Err(self.error(format!("atom line {i} does not have enough columns")));
            }
            let mut position = [0.0; 3];
            for (axis, col) in position.iter_mut().zip(&cols[..3]) {
                *axis = col
                    .parse()
                    .map_err(|_| self.error(format!("bad coordinate on atom line {i}")))?;
            }
            atoms.push(Atom {
                element: cols[3].to_string(),
                position,
            });
        }

        let data_start = lines
            .iter()
            .position(|l| l.trim() == "M  END")
            .map(|i| i + 1)
            .unwrap_or(end_atoms + n_bonds);

        Ok(Pose {
            title: lines[0].trim().to_string(),
            atoms,
            properties: parse_data_items(&lines[data_start.min(lines.len())..]),
        })
    }
}

impl<R: BufRead> Iterator for PoseReader<R> {
    type Item = Result<Pose>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_pose().transpose()
    }
}

/// Parse a fixed-width 3-character count, falling back to whitespace splitting
fn parse_count(line: &str, offset: usize) -> Option<usize> {
    if let Some(v) = line
        .get(offset..offset + 3)
        .and_then(|s| s.trim().parse().ok())
    {
        return Some(v);
    }
    line.split_whitespace().nth(offset / 3)?.parse().ok()
}

/// Collect `> <KEY>` data items; values span lines up to the next blank line
fn parse_data_items(lines: &[String]) -> HashMap<String, String> {
    let mut items = HashMap::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx].trim();
        idx += 1;
        if !line.starts_with('>') {
            continue;
        }
        let (Some(l), Some(r)) = (line.find('<'), line.rfind('>')) else {
            continue;
        };
        if r <= l + 1 {
            continue;
        }
        let key = line[l + 1..r].to_string();

        let mut values: Vec<&str> = Vec::new();
        while idx < lines.len() {
            let v = lines[idx].trim_end();
            if v.is_empty() || v.starts_with('>') {
                break;
            }
            values.push(v);
            idx += 1;
        }
        items.insert(key, values.join("\n"));
    }
    items
}
