//! Command-line surface for the node binary. Grounded on
//! `metta-systems-vesper`'s CLI tools (`clap` derive, a config path plus an
//! explicit run subcommand).
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "processwarp-node", about = "Runs a ProcessWarp cluster node")]
pub struct Cli {
    /// Path to the node's TOML configuration file.
    #[arg(long)]
    pub config: PathBuf,

    /// Overrides the node id from the config file.
    #[arg(long)]
    pub nid: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the node's event loop (the default when no subcommand is given).
    Run,
}
