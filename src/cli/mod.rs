use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod pair;
mod single;
mod view;

/// combind - docked-pose feature extraction
#[derive(Parser)]
#[command(name = "combind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-pose features (scores, names, RMSDs, fingerprints)
    Single {
        /// Analysis root
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// CSV with `ligand,path` rows naming reference structures
        #[arg(long, value_name = "CSV")]
        natives: Option<PathBuf>,

        /// Pose sources (.sdf.gz)
        #[arg(value_name = "POSES", required = true)]
        poses: Vec<PathBuf>,
    },

    /// Compute pairwise feature matrices
    Pair {
        /// Analysis root
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// CSV with `ligand,path` rows naming reference structures
        #[arg(long, value_name = "CSV")]
        natives: Option<PathBuf>,

        /// Pose source of a second collection compared against POSES (repeatable)
        #[arg(long, value_name = "POSE", action = clap::ArgAction::Append)]
        against: Option<Vec<PathBuf>>,

        /// Skip interaction-similarity matrices
        #[arg(long)]
        no_ifp: bool,

        /// Skip the shape-similarity matrix
        #[arg(long)]
        no_shape: bool,

        /// Skip the substructure-RMSD matrix
        #[arg(long)]
        no_mcss: bool,

        /// Worker threads for matrix filling (1 = sequential)
        #[arg(short = 'j', long, default_value = "1")]
        processes: usize,

        /// Pose sources (.sdf.gz)
        #[arg(value_name = "POSES", required = true)]
        poses: Vec<PathBuf>,
    },

    /// Print per-ligand block shapes of cached features as JSON
    View {
        /// Analysis root
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Ligand to include (repeatable)
        #[arg(long = "ligand", value_name = "LIGAND", required = true)]
        ligands: Vec<String>,

        /// Pair feature to include (repeatable)
        #[arg(long = "feature", value_name = "FEATURE")]
        features: Vec<String>,
    },
}

impl Cli {
    /// Verbosity count from `-v` flags
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Initialize env_logger from the verbosity count
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Run the selected command
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Single {
            root,
            config,
            natives,
            poses,
        } => single::run(root, config, natives, poses),
        Commands::Pair {
            root,
            config,
            natives,
            against,
            no_ifp,
            no_shape,
            no_mcss,
            processes,
            poses,
        } => pair::run(pair::PairArgs {
            root,
            config,
            natives,
            against,
            ifp: !no_ifp,
            shape: !no_shape,
            mcss: !no_mcss,
            processes,
            poses,
        }),
        Commands::View {
            root,
            config,
            ligands,
            features,
        } => view::run(root, config, ligands, features),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_against_takes_one_source_per_flag() {
        let cli = Cli::try_parse_from([
            "combind", "pair", "--root", "r", "--against", "x1.sdf.gz", "a.sdf.gz",
            "--against", "x2.sdf.gz", "b.sdf.gz",
        ])
        .unwrap();
        let Commands::Pair { against, poses, .. } = cli.command else {
            panic!("expected pair command");
        };
        assert_eq!(
            against,
            Some(vec![PathBuf::from("x1.sdf.gz"), PathBuf::from("x2.sdf.gz")])
        );
        assert_eq!(poses, vec![PathBuf::from("a.sdf.gz"), PathBuf::from("b.sdf.gz")]);
    }

    #[test]
    fn test_view_needs_only_root_and_ligand() {
        let cli = Cli::try_parse_from(["combind", "view", "--root", "r", "--ligand", "A"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::View { config: None, ref ligands, .. } if ligands == &["A".to_string()]
        ));
    }
}
