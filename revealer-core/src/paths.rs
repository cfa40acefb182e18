//! Directory + base name values used to compute rename targets.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::{RevealError, Result};

/// A file location split into its parent directory and base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingPath {
    dir: PathBuf,
    base_name: String,
}

impl SiblingPath {
    pub fn new(dir: impl Into<PathBuf>, base_name: &str) -> Result<Self> {
        validate_base_name(base_name)?;
        Ok(Self {
            dir: dir.into(),
            base_name: base_name.to_string(),
        })
    }

    /// Split `path` into directory and base name. The path must be non-blank
    /// and end in a UTF-8 file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RevealError::invalid_input("Invalid file path."));
        }
        let base_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                RevealError::invalid_input(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { dir, base_name })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Same directory, different base name.
    pub fn with_base_name(&self, base_name: &str) -> Result<Self> {
        Self::new(self.dir.clone(), base_name)
    }

    pub fn join(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }
}

/// Accept only a single normal path component.
pub fn validate_base_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RevealError::invalid_input("New name must not be empty."));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == OsStr::new(name) => Ok(()),
        _ => Err(RevealError::invalid_input(format!(
            "{name:?} is not a plain file name"
        ))),
    }
}
