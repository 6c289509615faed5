use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::FingerprintEngine;
use crate::config::IfpSettings;
use crate::error::{FeatureError, Result};
use crate::ifp::{self, IfpRecord};

/// Fingerprint engine run as an external program.
///
/// Invoked as `<program> --settings <json> --poses <pv> --out <csv> --max-poses <n>`;
/// the CSV it writes must follow the [`IfpRecord`] schema.
#[derive(Debug, Clone)]
pub struct CommandFingerprintEngine {
    program: PathBuf,
}

impl CommandFingerprintEngine {
    /// Use `program` as the fingerprint executable
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    fn failure(&self, poses: &Path, reason: impl Into<String>) -> FeatureError {
        FeatureError::ExternalTool {
            tool: self.program.display().to_string(),
            target: poses.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl FingerprintEngine for CommandFingerprintEngine {
    fn fingerprint(
        &self,
        settings: &IfpSettings,
        poses: &Path,
        max_poses: usize,
    ) -> Result<Vec<IfpRecord>> {
        let out = tempfile::Builder::new()
            .prefix("combind-ifp-")
            .suffix(".csv")
            .tempfile()?;
        let settings_json = serde_json::to_string(settings)?;

        debug!(
            "Running {} on {} (version {})",
            self.program.display(),
            poses.display(),
            settings.version
        );
        let output = Command::new(&self.program)
            .arg("--settings")
            .arg(&settings_json)
            .arg("--poses")
            .arg(poses)
            .arg("--out")
            .arg(out.path())
            .arg("--max-poses")
            .arg(max_poses.to_string())
            .output()
            .map_err(|e| self.failure(poses, format!("could not execute: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(
                poses,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let mut rows = ifp::read_table(BufReader::new(File::open(out.path())?))
            .map_err(|e| self.failure(poses, format!("unreadable output table: {e}")))?;
        rows.retain(|row| row.pose < max_poses);
        Ok(rows)
    }
}
