//! Rename and undo, sequenced against the ledger.
//!
//! The physical rename always completes before the ledger is written, so a
//! failed rename never leaves a record behind. A ledger failure after a
//! successful rename is reported as [`RevealError::LedgerWriteFailed`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::error::{RevealError, Result};
use crate::ledger::{RenameLedger, RenameRecord};
use crate::paths::SiblingPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    pub from: PathBuf,
    pub to: PathBuf,
    pub record: RenameRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UndoOutcome {
    Restored {
        from: PathBuf,
        to: PathBuf,
        record_id: i64,
    },
    /// No record produced the current name. Disk is unchanged.
    NothingToUndo { current_name: String },
}

pub fn perform_rename(
    ledger: &mut RenameLedger,
    path: &Path,
    new_name: &str,
) -> Result<RenameOutcome> {
    let source = SiblingPath::from_path(path)?;
    let metadata = fs::metadata(path).map_err(|e| RevealError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(RevealError::invalid_input(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let target = source.with_base_name(new_name)?;
    if target.base_name() == source.base_name() {
        return Err(RevealError::invalid_input(format!(
            "{} already has that name",
            path.display()
        )));
    }

    let from = source.join();
    let to = target.join();
    rename_no_clobber(&from, &to)?;

    let record = ledger
        .append(source.base_name(), target.base_name())
        .map_err(|source| {
            warn!(
                "{} was renamed to {} but the ledger write failed: {}",
                from.display(),
                to.display(),
                source
            );
            RevealError::LedgerWriteFailed {
                from: from.clone(),
                to: to.clone(),
                source,
            }
        })?;

    info!("Renamed {} -> {} (record #{})", from.display(), to.display(), record.id);
    Ok(RenameOutcome { from, to, record })
}

pub fn perform_undo(ledger: &RenameLedger, path: &Path) -> Result<UndoOutcome> {
    let current = SiblingPath::from_path(path)?;

    let Some(record) = ledger.find_latest(current.base_name())? else {
        return Ok(UndoOutcome::NothingToUndo {
            current_name: current.base_name().to_string(),
        });
    };

    let restored = current.with_base_name(&record.original_name)?;
    let from = current.join();
    let to = restored.join();
    rename_no_clobber(&from, &to)?;

    info!(
        "Undo: {} -> {} (record #{})",
        from.display(),
        to.display(),
        record.id
    );
    Ok(UndoOutcome::Restored {
        from,
        to,
        record_id: record.id,
    })
}

/// `fs::rename` silently replaces an existing target on most platforms.
fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(RevealError::DestinationExists {
            path: to.to_path_buf(),
        });
    }
    fs::rename(from, to).map_err(|e| RevealError::from_rename(from, e))
}
