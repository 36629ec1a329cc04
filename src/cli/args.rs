//! CLI argument definitions using clap
//!
//! Commands:
//! - cms-timeline replay --file <records.json> [--step N]
//! - cms-timeline timeline --config <path> --resource-name <name> --resource-id <id> [--step N]
//! - cms-timeline diff <before.json> <after.json>
//! - cms-timeline request --config <path> <request-id>
//! - cms-timeline stats --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rebuild resource history and request activity from a CMS backend
#[derive(Parser, Debug)]
#[command(name = "cms-timeline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconstruct a resource from a saved list of history entries
    Replay {
        /// JSON array of history entries, or a backend response holding one
        #[arg(long)]
        file: PathBuf,

        /// Step to reconstruct (default: the last one)
        #[arg(long)]
        step: Option<usize>,
    },

    /// Fetch a resource's timeline and reconstruct one step
    Timeline {
        /// Path to configuration file
        #[arg(long, default_value = "./cms-timeline.json")]
        config: PathBuf,

        #[arg(long)]
        resource_name: String,

        #[arg(long)]
        resource_id: String,

        /// Step to reconstruct (default: the last one)
        #[arg(long)]
        step: Option<usize>,
    },

    /// Diff two JSON documents the way the backend records changes
    Diff { before: PathBuf, after: PathBuf },

    /// Show one request log and the actions it performed
    Request {
        /// Path to configuration file
        #[arg(long, default_value = "./cms-timeline.json")]
        config: PathBuf,

        request_id: String,
    },

    /// Aggregate request statistics into chart data
    Stats {
        /// Path to configuration file
        #[arg(long, default_value = "./cms-timeline.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
