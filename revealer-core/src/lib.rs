pub mod controller;
pub mod error;
pub mod ledger;
pub mod paths;
pub mod revealer;
pub mod settings;
pub mod signature;

pub use controller::{perform_rename, perform_undo, RenameOutcome, UndoOutcome};
pub use error::{RevealError, Result};
pub use ledger::{RenameLedger, RenameRecord};
pub use paths::SiblingPath;
pub use revealer::Revealer;
pub use settings::RevealerSettings;
pub use signature::{detect, FileKind, FileSignature, SignatureDetector};
