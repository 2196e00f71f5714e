//! CLI argument definitions using clap
//!
//! Commands:
//! - luckydraw serve [--config <path>]
//! - luckydraw run [--config <path>]
//! - luckydraw draw --candidates <file> --count <n> [--prize <label>] [--seed <n>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lucky draw: random winner selection with forfeits and redraws
#[derive(Parser, Debug)]
#[command(name = "luckydraw")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Read JSON requests from stdin, one per line
    Run {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Draw once from a candidate file and print the session
    Draw {
        /// Candidate list; `.csv` files use the first column
        #[arg(long)]
        candidates: PathBuf,

        /// Number of winners
        #[arg(long)]
        count: usize,

        /// Prize label
        #[arg(long, default_value = "")]
        prize: String,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
