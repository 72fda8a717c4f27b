//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --verbose, --config) are inherited by all subcommands
//! - `worker` is normally launched by `trigger`, not by hand

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rigcascade - republish stale rigs after a model publish
#[derive(Parser, Debug)]
#[command(name = "rigcascade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./rigcascade.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run after a publish: find stale dependents and republish them
    Trigger {
        /// Asset that was published
        #[arg(long)]
        asset: String,

        /// Subset that received the new version
        #[arg(long)]
        subset: String,

        /// Published version id (defaults to the latest)
        #[arg(long)]
        version: Option<String>,
    },

    /// Republish dependents described by a job descriptor
    Worker {
        /// JSON job descriptor
        #[arg(long, conflicts_with = "args")]
        payload: Option<String>,

        /// Positional form: asset_name=… model_subset=… rig_versions=<json>
        #[arg(value_name = "KEY=VALUE", required_unless_present = "payload")]
        args: Vec<String>,
    },

    /// List stale dependents without launching anything
    Stale {
        /// Asset to inspect
        #[arg(long)]
        asset: String,

        /// Base subset
        #[arg(long)]
        subset: String,

        /// Base version id (defaults to the latest)
        #[arg(long)]
        version: Option<String>,
    },
}
