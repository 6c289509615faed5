//! Shared fixtures: synthetic gzip SDF pose sources, a type library and
//! deterministic stand-ins for the external tools.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use combind::config::{FeatureConfig, IfpSettings, ToolConfig};
use combind::error::Result;
use combind::ifp::IfpRecord;
use combind::pose::PoseReader;
use combind::tools::{FingerprintEngine, RmsdTool, Toolbox};
use flate2::write::GzEncoder;
use flate2::Compression;

/// One SDF record: a small C/N/O/H fragment shifted along x
pub fn sdf_record(title: &str, shift: f64, score: f64) -> String {
    let atoms = [
        ("C", [shift, 0.0, 0.0]),
        ("N", [shift + 1.3, 0.4, 0.0]),
        ("O", [shift, 1.2, 0.3]),
        ("C", [shift + 0.6, -1.1, 0.8]),
        ("H", [shift - 0.9, -0.3, 0.0]),
    ];
    let mut s = format!(
        "{title}\n  combind-test\n\n{:>3}  0  0  0  0  0  0  0  0  0999 V2000\n",
        atoms.len()
    );
    for (element, [x, y, z]) in atoms {
        s.push_str(&format!(
            "{x:>10.4}{y:>10.4}{z:>10.4} {element:<3} 0  0  0  0  0  0  0  0  0  0  0  0\n"
        ));
    }
    s.push_str(&format!("M  END\n> <CNNaffinity>\n{score}\n\n$$$$\n"));
    s
}

/// Write a gzip pose source holding `(ligand, score)` poses in order
pub fn write_pose_source(path: &Path, poses: &[(&str, f64)]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut gz = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    for (i, (ligand, score)) in poses.iter().enumerate() {
        gz.write_all(sdf_record(ligand, i as f64 * 0.45, *score).as_bytes())
            .unwrap();
    }
    gz.finish().unwrap();
    path.to_path_buf()
}

/// Write `<dir>/mcss16.typ` and return `dir`
pub fn write_type_library(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("mcss16.typ"), "# test types\nC C\nN N\nO O\n").unwrap();
    dir.to_path_buf()
}

/// Configuration for `root` with a fresh type library under it
pub fn config(root: &Path, max_poses: usize) -> FeatureConfig {
    FeatureConfig::new(root)
        .with_type_library(write_type_library(&root.join("typ")))
        .with_max_poses(max_poses)
}

/// RMSD to the reference: the pose's x offset
pub struct OffsetRmsd;

impl RmsdTool for OffsetRmsd {
    fn rmsd_to_reference(&self, _reference: &Path, poses: &Path) -> Result<Vec<f64>> {
        Ok(PoseReader::read_all(poses, None)?
            .iter()
            .map(|p| p.atoms[0].position[0].abs())
            .collect())
    }
}

/// Residue contacts derived from pose geometry
pub struct GridFingerprint;

impl FingerprintEngine for GridFingerprint {
    fn fingerprint(
        &self,
        _settings: &IfpSettings,
        poses: &Path,
        max_poses: usize,
    ) -> Result<Vec<IfpRecord>> {
        let mut rows = Vec::new();
        for (i, pose) in PoseReader::read_all(poses, Some(max_poses))?.iter().enumerate() {
            let cell = (pose.atoms[0].position[0] / 0.9).floor() as i64;
            rows.push(IfpRecord {
                pose: i,
                label: "hbond_acceptor".to_string(),
                residue: format!("A:SER:{cell}"),
                score: 0.8,
            });
            rows.push(IfpRecord {
                pose: i,
                label: "contact".to_string(),
                residue: format!("A:LEU:{}", cell + 1),
                score: 0.25 * (i % 3 + 1) as f64,
            });
            if i % 2 == 0 {
                rows.push(IfpRecord {
                    pose: i,
                    label: "saltbridge".to_string(),
                    residue: "A:ASP:189".to_string(),
                    score: 1.0,
                });
            }
        }
        Ok(rows)
    }
}

/// Default providers with the external tools replaced by the stand-ins
pub fn toolbox(config: &FeatureConfig) -> Toolbox {
    Toolbox::from_config(config, &ToolConfig::default())
        .unwrap()
        .with_rmsd_tool(OffsetRmsd)
        .with_fingerprint_engine(GridFingerprint)
}

/// Every file under `dir` with its bytes, sorted by path
pub fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let bytes = fs::read(&path).unwrap();
                files.push((path, bytes));
            }
        }
    }
    files.sort();
    files
}
