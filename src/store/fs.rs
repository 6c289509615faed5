use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{Array1, Array2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};

use super::npy_str::{self, NpyHeader};
use super::{Artifact, ArtifactStore};
use crate::error::{FeatureError, Result};
use crate::ifp;

/// Filesystem-backed store: `.npy` for arrays, `.csv` for fingerprint tables
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    /// Create a filesystem store
    pub fn new() -> Self {
        Self
    }

    fn is_csv(key: &Path) -> bool {
        key.extension().is_some_and(|ext| ext == "csv")
    }

    fn peek_header(key: &Path) -> Result<NpyHeader> {
        let mut reader = BufReader::new(File::open(key)?);
        npy_str::read_header(&mut reader)
    }

    fn read_numeric(key: &Path, header: &NpyHeader) -> Result<Artifact> {
        let reader = || -> Result<BufReader<File>> { Ok(BufReader::new(File::open(key)?)) };
        // Integer sentinels written by older tooling are widened to f64
        let integer = matches!(header.descr.as_str(), "<i8" | "<i4");
        match (header.shape.len(), integer) {
            (1, false) => Ok(Artifact::Vector(Array1::<f64>::read_npy(reader()?)?)),
            (1, true) if header.descr == "<i8" => Ok(Artifact::Vector(
                Array1::<i64>::read_npy(reader()?)?.mapv(|v| v as f64),
            )),
            (1, true) => Ok(Artifact::Vector(
                Array1::<i32>::read_npy(reader()?)?.mapv(f64::from),
            )),
            (2, _) => Ok(Artifact::Matrix(Array2::<f64>::read_npy(reader()?)?)),
            (ndim, _) => Err(FeatureError::NpyFormat(format!(
                "{} has unsupported dimensionality {ndim}",
                key.display()
            ))),
        }
    }
}

impl ArtifactStore for FileStore {
    fn has(&self, key: &Path) -> bool {
        key.is_file()
    }

    fn get(&self, key: &Path) -> Result<Artifact> {
        if Self::is_csv(key) {
            let rows = ifp::read_table(BufReader::new(File::open(key)?))?;
            return Ok(Artifact::Interactions(rows));
        }
        let header = Self::peek_header(key)?;
        if header.is_unicode() {
            return Ok(Artifact::Names(npy_str::read_names(BufReader::new(
                File::open(key)?,
            ))?));
        }
        Self::read_numeric(key, &header)
    }

    fn put(&self, key: &Path, value: &Artifact) -> Result<()> {
        if let Some(parent) = key.parent() {
            fs::create_dir_all(parent)?;
        }
        match (value, Self::is_csv(key)) {
            (Artifact::Interactions(rows), true) => {
                ifp::write_table(BufWriter::new(File::create(key)?), rows)?
            }
            (Artifact::Vector(v), false) => v.write_npy(BufWriter::new(File::create(key)?))?,
            (Artifact::Matrix(m), false) => m.write_npy(BufWriter::new(File::create(key)?))?,
            (Artifact::Names(names), false) => {
                npy_str::write_names(BufWriter::new(File::create(key)?), names)?
            }
            (_, csv) => {
                return Err(FeatureError::ArtifactKind {
                    path: key.to_path_buf(),
                    expected: if csv { "fingerprint table" } else { "npy array" },
                })
            }
        }
        debug!("Wrote {} ({})", key.display(), value.kind());
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "npy") {
                keys.push(path);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
