//! Error taxonomy shared by the detector, the ledger and the controller.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced to the caller. Nothing is retried or swallowed internally.
#[derive(Debug, Error)]
pub enum RevealError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found or not readable: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("Ledger error: {0}")]
    Ledger(#[from] rusqlite::Error),

    /// The physical rename already happened; only the audit record is missing.
    #[error(
        "File was renamed from {} to {} but the rename could not be logged: {source}",
        from.display(),
        to.display()
    )]
    LedgerWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to export ledger: {0}")]
    Export(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RevealError>;

impl RevealError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Classify an I/O failure against `path`. Missing and unreadable files
    /// both become `NotFound`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Classify a failed rename. Only a missing source is `NotFound`;
    /// permission and cross-device failures stay `Io`.
    pub fn from_rename(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// True when the filesystem changed even though the call failed.
    pub fn is_divergent(&self) -> bool {
        matches!(self, Self::LedgerWriteFailed { .. })
    }
}
