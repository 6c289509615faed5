use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::RmsdTool;
use crate::error::{FeatureError, Result};

/// Open Babel `obrms` invoked as `obrms <reference> <poses> --firstonly`
#[derive(Debug, Clone)]
pub struct ObRms {
    program: PathBuf,
}

impl ObRms {
    /// Use `program` as the obrms executable
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

impl Default for ObRms {
    fn default() -> Self {
        Self::new("obrms")
    }
}

impl RmsdTool for ObRms {
    fn rmsd_to_reference(&self, reference: &Path, poses: &Path) -> Result<Vec<f64>> {
        debug!(
            "Running {} {} {} --firstonly",
            self.program.display(),
            reference.display(),
            poses.display()
        );
        let output = Command::new(&self.program)
            .arg(reference)
            .arg(poses)
            .arg("--firstonly")
            .output()
            .map_err(|e| self.failure(poses, format!("could not execute: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(
                poses,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_rmsd_output(&stdout).map_err(|reason| self.failure(poses, reason))
    }
}

/// Parse one RMSD per line, taken from the last whitespace-separated token
pub fn parse_rmsd_output(text: &str) -> std::result::Result<Vec<f64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("no RMSD lines in output".to_string());
    }
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            line.split_whitespace()
                .last()
                .and_then(|token| token.parse::<f64>().ok())
                .ok_or_else(|| format!("unparsable RMSD on line {}: {line:?}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rmsd_output() {
        let out = "RMSD LIG1:LIG1 0.512\nRMSD LIG1:LIG1 2.25\nRMSD LIG1:LIG1 7\n";
        assert_eq!(parse_rmsd_output(out).unwrap(), vec![0.512, 2.25, 7.0]);
    }

    #[test]
    fn test_parse_rmsd_output_rejects_garbage() {
        assert!(parse_rmsd_output("").is_err());
        assert!(parse_rmsd_output("RMSD LIG1:LIG1 0.5\nSegmentation fault\n").is_err());
    }

    #[test]
    fn test_missing_program_is_tool_failure() {
        let tool = ObRms::new("/nonexistent/obrms-binary");
        let err = tool
            .rmsd_to_reference(Path::new("ref.sdf"), Path::new("poses.sdf.gz"))
            .unwrap_err();
        assert!(matches!(err, FeatureError::ExternalTool { .. }));
    }
}
