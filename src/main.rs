//! Revealer - file type detection and reversible renames

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use revealer_core::{RevealError, Revealer, RevealerSettings, UndoOutcome};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = RevealerSettings {
        ledger_path: cli.db,
        sample_len: cli.sample_len,
    };
    let mut revealer = Revealer::open(&settings).with_context(|| {
        format!("Failed to open rename log at {}", settings.ledger_path.display())
    })?;

    match cli.command {
        Commands::Reveal { path } => {
            let signature = revealer.detect(&path)?;
            println!("The detected file extension is: {}", signature.label());
            if signature.is_known() {
                println!("  Details: {}", signature);
            }
            Ok(())
        }

        Commands::Rename { path, new_name } => match revealer.perform_rename(&path, &new_name) {
            Ok(outcome) => {
                println!("File renamed to: {}", outcome.to.display());
                Ok(())
            }
            Err(err @ RevealError::LedgerWriteFailed { .. }) => {
                eprintln!("Warning: the file WAS renamed, but the rename log is now out of date.");
                Err(err.into())
            }
            Err(err) => {
                println!("File not renamed.");
                Err(err.into())
            }
        },

        Commands::Undo { path } => {
            match revealer.perform_undo(&path)? {
                UndoOutcome::Restored { to, .. } => {
                    println!("Undo: File reverted to original path: {}", to.display());
                }
                UndoOutcome::NothingToUndo { .. } => {
                    println!("No renaming operation to undo.");
                }
            }
            Ok(())
        }

        Commands::Log { json } => {
            let records = revealer.list_all()?;
            if records.is_empty() {
                println!("No changes in the log.");
            } else {
                println!("Changes in the log:");
                for record in &records {
                    println!("{} -> {}", record.original_name, record.renamed_name);
                }
            }

            if let Some(json_path) = json {
                revealer.export_log(&json_path)?;
                println!();
                println!("Log exported to: {}", json_path.display());
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
