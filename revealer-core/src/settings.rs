use std::path::PathBuf;

use crate::signature::SAMPLE_LEN;

/// Default ledger file, relative to the working directory
pub const DEFAULT_LEDGER_PATH: &str = "log.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealerSettings {
    pub ledger_path: PathBuf,
    pub sample_len: usize, // header bytes read per detection
}

impl Default for RevealerSettings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            sample_len: SAMPLE_LEN,
        }
    }
}
