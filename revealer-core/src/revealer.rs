//! Caller-facing API: one detector and one ledger behind four operations.

use std::path::Path;

use log::debug;

use crate::controller::{self, RenameOutcome, UndoOutcome};
use crate::error::Result;
use crate::ledger::{RenameLedger, RenameRecord};
use crate::settings::RevealerSettings;
use crate::signature::{FileSignature, SignatureDetector};

pub struct Revealer {
    detector: SignatureDetector,
    ledger: RenameLedger,
}

impl Revealer {
    /// Open (creating if needed) the ledger named in `settings`.
    pub fn open(settings: &RevealerSettings) -> Result<Self> {
        let detector = SignatureDetector::with_sample_len(settings.sample_len)?;
        let ledger = RenameLedger::open(&settings.ledger_path)?;
        debug!("Opened ledger at {}", settings.ledger_path.display());
        Ok(Self::with_parts(detector, ledger))
    }

    pub fn with_parts(detector: SignatureDetector, ledger: RenameLedger) -> Self {
        Self { detector, ledger }
    }

    pub fn detect(&self, path: &Path) -> Result<FileSignature> {
        self.detector.detect(path)
    }

    pub fn perform_rename(&mut self, path: &Path, new_name: &str) -> Result<RenameOutcome> {
        controller::perform_rename(&mut self.ledger, path, new_name)
    }

    pub fn perform_undo(&self, path: &Path) -> Result<UndoOutcome> {
        controller::perform_undo(&self.ledger, path)
    }

    pub fn list_all(&self) -> Result<Vec<RenameRecord>> {
        self.ledger.list_all()
    }

    pub fn export_log(&self, output_path: &Path) -> Result<()> {
        self.ledger.export_json(output_path)
    }

    pub fn ledger(&self) -> &RenameLedger {
        &self.ledger
    }
}
