//! Content-based file type detection from a bounded header sample

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{RevealError, Result};

/// Default number of header bytes sampled per file
pub const SAMPLE_LEN: usize = 128;

/// Upper bound on a configured sample length
pub const MAX_SAMPLE_LEN: usize = 8 * 1024;

/// BPG image: 42 50 47 FB
const BPG_MAGIC: [u8; 4] = [0x42, 0x50, 0x47, 0xFB];

/// FreeArc archive: "ArC\x01"
const FREEARC_MAGIC: [u8; 4] = [0x41, 0x72, 0x43, 0x01];

/// Coarse format category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Archive,
    Document,
    Book,
    Font,
    Application,
    Text,
    Other,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Archive => "archive",
            FileKind::Document => "document",
            FileKind::Book => "book",
            FileKind::Font => "font",
            FileKind::Application => "application",
            FileKind::Text => "text",
            FileKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Result of a detection call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileSignature {
    Known {
        extension: &'static str,
        mime_type: &'static str,
        kind: FileKind,
    },
    Unknown,
}

impl FileSignature {
    pub fn is_known(&self) -> bool {
        matches!(self, FileSignature::Known { .. })
    }

    /// Extension for a match, `"Unknown"` otherwise.
    pub fn label(&self) -> &'static str {
        match self {
            FileSignature::Known { extension, .. } => extension,
            FileSignature::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FileSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSignature::Known {
                extension,
                mime_type,
                kind,
            } => write!(f, "{extension} ({mime_type}, {kind})"),
            FileSignature::Unknown => f.write_str("Unknown"),
        }
    }
}

fn is_bpg(buf: &[u8]) -> bool {
    buf.starts_with(&BPG_MAGIC)
}

fn is_freearc(buf: &[u8]) -> bool {
    buf.starts_with(&FREEARC_MAGIC)
}

/// Signature library plus the sample size used when reading files.
pub struct SignatureDetector {
    matchers: infer::Infer,
    sample_len: usize,
}

impl SignatureDetector {
    pub fn new() -> Self {
        let mut matchers = infer::Infer::new();
        matchers.add("image/bpg", "bpg", is_bpg);
        matchers.add("application/x-freearc", "arc", is_freearc);
        Self {
            matchers,
            sample_len: SAMPLE_LEN,
        }
    }

    pub fn with_sample_len(sample_len: usize) -> Result<Self> {
        if sample_len == 0 || sample_len > MAX_SAMPLE_LEN {
            return Err(RevealError::invalid_input(format!(
                "sample length must be between 1 and {MAX_SAMPLE_LEN} bytes, got {sample_len}"
            )));
        }
        let mut detector = Self::new();
        detector.sample_len = sample_len;
        Ok(detector)
    }

    pub fn sample_len(&self) -> usize {
        self.sample_len
    }

    /// Read at most `sample_len` bytes from the start of `path` and classify
    /// them. The file is opened read-only.
    pub fn detect(&self, path: &Path) -> Result<FileSignature> {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RevealError::invalid_input("Invalid file path."));
        }

        let metadata = fs::metadata(path).map_err(|e| RevealError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(RevealError::invalid_input(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let sample = self.read_sample(path)?;
        let signature = self.detect_bytes(&sample);
        debug!(
            "Detected {} for {} from {} header bytes",
            signature,
            path.display(),
            sample.len()
        );
        Ok(signature)
    }

    /// Classify an in-memory header sample.
    pub fn detect_bytes(&self, sample: &[u8]) -> FileSignature {
        if sample.is_empty() {
            return FileSignature::Unknown;
        }
        match self.matchers.get(sample) {
            Some(t) => FileSignature::Known {
                extension: t.extension(),
                mime_type: t.mime_type(),
                kind: kind_of(&t),
            },
            None => FileSignature::Unknown,
        }
    }

    fn read_sample(&self, path: &Path) -> Result<Vec<u8>> {
        let file = File::open(path).map_err(|e| RevealError::from_io(path, e))?;
        let mut sample = Vec::with_capacity(self.sample_len);
        file.take(self.sample_len as u64)
            .read_to_end(&mut sample)
            .map_err(|e| RevealError::from_io(path, e))?;
        Ok(sample)
    }
}

impl Default for SignatureDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect with the default signature library and sample size.
pub fn detect(path: &Path) -> Result<FileSignature> {
    SignatureDetector::new().detect(path)
}

fn kind_of(t: &infer::Type) -> FileKind {
    // infer files PDF and PostScript under archives
    match t.mime_type() {
        "application/pdf" | "application/postscript" | "application/rtf" => {
            return FileKind::Document
        }
        _ => {}
    }
    match t.matcher_type() {
        infer::MatcherType::Image => FileKind::Image,
        infer::MatcherType::Video => FileKind::Video,
        infer::MatcherType::Audio => FileKind::Audio,
        infer::MatcherType::Archive => FileKind::Archive,
        infer::MatcherType::Doc => FileKind::Document,
        infer::MatcherType::Book => FileKind::Book,
        infer::MatcherType::Font => FileKind::Font,
        infer::MatcherType::App => FileKind::Application,
        infer::MatcherType::Text => FileKind::Text,
        _ => kind_from_mime(t.mime_type()),
    }
}

fn kind_from_mime(mime: &str) -> FileKind {
    match mime.split('/').next() {
        Some("image") => FileKind::Image,
        Some("video") => FileKind::Video,
        Some("audio") => FileKind::Audio,
        Some("text") => FileKind::Text,
        _ if mime == "application/x-freearc" => FileKind::Archive,
        _ => FileKind::Other,
    }
}
