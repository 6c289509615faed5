//! # combind
//!
//! Command-line front end for docked-pose feature extraction.
//!
//! ## Usage
//!
//! ```bash
//! # Per-pose features for every pose source
//! combind single --root runs/2XYZ --natives natives.csv runs/2XYZ/docking/*.sdf.gz
//!
//! # Pairwise matrices on four workers
//! combind -v pair --root runs/2XYZ -j 4 runs/2XYZ/docking/*.sdf.gz
//!
//! # Block shapes for two ligands
//! combind view --root runs/2XYZ --ligand LIG1 --ligand LIG2 --feature shape
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
