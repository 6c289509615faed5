use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use super::config;

/// Compute per-pose features for every pose source
pub fn run(
    root: PathBuf,
    config_path: Option<PathBuf>,
    natives: Option<PathBuf>,
    poses: Vec<PathBuf>,
) -> Result<()> {
    let features = config::open(root, config_path.as_deref())?;
    let natives = config::read_natives(natives.as_deref())?;

    info!("Single features for {} pose sources", poses.len());
    let stats = features
        .compute_single_features(&poses, &natives)
        .context("Single-feature extraction failed")?;

    println!(
        "{} sources: {} artifacts computed, {} cached, {} sources without usable RMSDs",
        stats.sources, stats.computed, stats.cached, stats.rmsd_fallbacks
    );
    Ok(())
}
