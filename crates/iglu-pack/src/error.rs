//! Error types for packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole packaging run, or a standalone operation.
#[derive(Debug, Error)]
pub enum PackError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The plugin manifest could not be read or parsed.
    #[error("Cannot load manifest {}: {reason}", .path.display())]
    ManifestUnreadable { path: PathBuf, reason: String },

    /// Manifest validation error.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Unknown target string.
    #[error("Unknown target: {0}")]
    InvalidTarget(String),

    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Checksum mismatch.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Checksum sidecar does not hold a `<digest>  <name>` line.
    #[error("Malformed checksum file: {}", .0.display())]
    MalformedChecksum(PathBuf),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A mandatory pipeline step failed for one target.
///
/// Each variant carries the diagnostic text of the failing step: the
/// combined output of the external tool, or the I/O error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The target output directory could not be prepared.
    #[error("prepare failed: {0}")]
    PrepareFailed(String),

    /// The compiler could not start or exited non-zero.
    #[error("compile failed: {0}")]
    CompileFailed(String),

    /// The compressor could not start or exited non-zero.
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    /// The manifest could not be read or written.
    #[error("manifest copy failed: {0}")]
    ManifestCopyFailed(String),

    /// The checksum could not be computed or persisted.
    #[error("checksum failed: {0}")]
    ChecksumFailed(String),
}

impl StepError {
    /// Name of the step that failed.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::PrepareFailed(_) => "prepare",
            Self::CompileFailed(_) => "compile",
            Self::CompressionFailed(_) => "compress",
            Self::ManifestCopyFailed(_) => "copy-manifest",
            Self::ChecksumFailed(_) => "checksum",
        }
    }

    /// Captured diagnostic text.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::PrepareFailed(text)
            | Self::CompileFailed(text)
            | Self::CompressionFailed(text)
            | Self::ManifestCopyFailed(text)
            | Self::ChecksumFailed(text) => text,
        }
    }
}

impl serde::Serialize for StepError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("StepError", 2)?;
        state.serialize_field("step", self.step())?;
        state.serialize_field("output", self.output())?;
        state.end()
    }
}
