//! Command-line interface for Revealer

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use revealer_core::settings::DEFAULT_LEDGER_PATH;
use revealer_core::signature::SAMPLE_LEN;

#[derive(Parser)]
#[command(name = "revealer")]
#[command(about = "Revealer - detect a file's real type and rename it with undo", long_about = None)]
pub struct Cli {
    /// Rename ledger database
    #[arg(long, global = true, env = "REVEALER_DB", default_value = DEFAULT_LEDGER_PATH)]
    pub db: PathBuf,

    /// Header bytes sampled for type detection
    #[arg(long, global = true, default_value_t = SAMPLE_LEN)]
    pub sample_len: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the file type detected from the file's contents
    Reveal {
        /// File to inspect
        path: PathBuf,
    },

    /// Rename a file within its directory and log the rename
    Rename {
        /// File to rename
        path: PathBuf,

        /// New file name (with extension, no directory)
        new_name: String,
    },

    /// Revert the most recent logged rename that produced this file's name
    Undo {
        /// File whose name should be reverted
        path: PathBuf,
    },

    /// Print every logged rename
    Log {
        /// Also write the log as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}
