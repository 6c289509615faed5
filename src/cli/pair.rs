use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use combind::features::PairFeatureSet;

use super::config;

/// Arguments of the `pair` command
pub struct PairArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub natives: Option<PathBuf>,
    pub against: Option<Vec<PathBuf>>,
    pub ifp: bool,
    pub shape: bool,
    pub mcss: bool,
    pub processes: usize,
    pub poses: Vec<PathBuf>,
}

/// Run the single-feature stage for every source, then the pair stage
pub fn run(args: PairArgs) -> Result<()> {
    let features = config::open(args.root, args.config.as_deref())?;
    let natives = config::read_natives(args.natives.as_deref())?;

    let mut all = args.poses.clone();
    all.extend(args.against.iter().flatten().cloned());
    features
        .compute_single_features(&all, &natives)
        .context("Single-feature extraction failed")?;

    let which = PairFeatureSet {
        ifp: args.ifp,
        shape: args.shape,
        mcss: args.mcss,
    };
    info!(
        "Pair features over {} sources with {} worker(s)",
        all.len(),
        args.processes.max(1)
    );
    let report = features
        .compute_pair_features(&args.poses, args.against.as_deref(), which, args.processes)
        .context("Pair-feature extraction failed")?;

    #[cfg(feature = "colorized_output")]
    {
        print!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", report);
    }

    if !report.is_success() {
        let failed: Vec<&str> = report.failed_families().collect();
        anyhow::bail!("Pair features failed: {}", failed.join(", "));
    }
    Ok(())
}
