//! Settings resolution for the CLI.
//!
//! The analysis root always comes from `--root`; everything else may come
//! from a `combind.toml` file (see [`combind::config`]):
//!
//! ```toml
//! [features]
//! max_poses = 100
//! type_library = "/opt/combind/features"
//!
//! [tools]
//! obrms = "/usr/local/bin/obrms"
//! ```
//!
//! Reference structures are listed in a two-column CSV:
//!
//! ```text
//! ligand,path
//! LIG1,structures/ligands/LIG1.sdf
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use combind::config::{ConfigFile, FeatureConfig, ToolConfig};
use combind::features::Features;
use combind::store::FileStore;

/// Build a pipeline for `root`, applying an optional config file
pub fn open(root: PathBuf, config: Option<&Path>) -> Result<Features> {
    let (features, tools) = load(root, config)?;
    Features::open(features, &tools).context("Invalid feature configuration")
}

/// Open the persisted artifacts of `root` for viewing; no type library is needed
pub fn open_viewer(root: PathBuf, config: Option<&Path>) -> Result<Features> {
    let (features, _) = load(root, config)?;
    Features::viewer(features, Arc::new(FileStore::new()))
        .context("Invalid feature configuration")
}

/// Resolve feature and tool settings for `root`
pub fn load(root: PathBuf, config: Option<&Path>) -> Result<(FeatureConfig, ToolConfig)> {
    let file = match config {
        Some(path) => ConfigFile::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let mut features = file.features.unwrap_or_default();
    features.root = root;
    Ok((features, file.tools))
}

#[derive(Debug, Deserialize)]
struct NativeRow {
    ligand: String,
    path: PathBuf,
}

/// Read a `ligand,path` reference-structure table
pub fn read_natives(path: Option<&Path>) -> Result<HashMap<String, PathBuf>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open reference table: {}", path.display()))?;
    let mut natives = HashMap::new();
    for row in reader.deserialize() {
        let row: NativeRow =
            row.with_context(|| format!("Malformed reference table: {}", path.display()))?;
        natives.insert(row.ligand, row.path);
    }
    Ok(natives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use combind::store::{Artifact, ArtifactStore};
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_load_overrides_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combind.toml");
        std::fs::write(&path, "[features]\nroot = \"/elsewhere\"\nmax_poses = 7\n").unwrap();

        let (features, tools) = load(dir.path().to_path_buf(), Some(&path)).unwrap();
        assert_eq!(features.root, dir.path());
        assert_eq!(features.max_poses, 7);
        assert_eq!(tools, ToolConfig::default());
    }

    #[test]
    fn test_viewer_without_type_library() {
        let dir = tempdir().unwrap();
        let store = FileStore::new();
        let names: Vec<String> = ["A_0-to-X", "A_1-to-X", "B_0-to-X"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let arrays = [
            ("name1.npy", Artifact::Names(names)),
            ("gscore1.npy", Artifact::Vector(array![5.0, 4.0, 6.0])),
            ("rmsd1.npy", Artifact::Vector(array![-1.0, -1.0, -1.0])),
        ];
        for (file, artifact) in &arrays {
            store.put(&dir.path().join(file), artifact).unwrap();
        }

        assert!(open(dir.path().to_path_buf(), None).is_err());

        let mut viewer = open_viewer(dir.path().to_path_buf(), None).unwrap();
        let view = viewer.get_view(&["A", "B"], &[]).unwrap();
        assert_eq!(view.gscore["A"].len(), 2);
        assert_eq!(view.rmsd["B"].len(), 1);
    }

    #[test]
    fn test_read_natives() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("natives.csv");
        std::fs::write(&path, "ligand,path\nLIG1, structures/LIG1.sdf\n").unwrap();

        let natives = read_natives(Some(&path)).unwrap();
        assert_eq!(natives["LIG1"], PathBuf::from("structures/LIG1.sdf"));
        assert!(read_natives(None).unwrap().is_empty());
    }
}
