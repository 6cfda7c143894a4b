//! Plugin manifest loading and validation.
//!
//! The manifest is `plugin.toml` at the root of the plugin source tree:
//!
//! ```toml
//! ID = "demo"
//! NAME = "Demo Plugin"
//! AUTHOR = "Jane Doe"
//! VERSION = "1.0.0"
//! ```

use crate::{MANIFEST_FILE, PackError, PackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plugin metadata read from `plugin.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin identifier; names every artifact.
    #[serde(rename = "ID", default)]
    pub id: String,

    /// Human-readable name.
    #[serde(rename = "NAME", default)]
    pub name: String,

    #[serde(rename = "AUTHOR", default)]
    pub author: String,

    #[serde(rename = "VERSION", default)]
    pub version: String,
}

impl PluginManifest {
    /// Load a manifest from a file.
    pub fn from_file(path: impl AsRef<Path>) -> PackResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PackError::ManifestUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Self::parse(&content).map_err(|e| PackError::ManifestUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse a manifest from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reload fields from `<source_dir>/plugin.toml`.
    ///
    /// On failure the current fields are left untouched and the error is
    /// returned for the caller to report.
    pub fn reload_from(&mut self, source_dir: impl AsRef<Path>) -> PackResult<()> {
        *self = load_manifest(source_dir)?;
        Ok(())
    }

    /// Validate the manifest.
    ///
    /// The id becomes a file name, so it must be non-empty and free of path
    /// separators, `.`/`..` and whitespace.
    pub fn validate(&self) -> PackResult<()> {
        if self.id.is_empty() {
            return Err(PackError::InvalidManifest(
                "plugin ID cannot be empty".to_string(),
            ));
        }

        if self.id == "." || self.id.contains(['/', '\\']) || self.id.contains("..") {
            return Err(PackError::InvalidManifest(format!(
                "plugin ID '{}' must be a plain file name",
                self.id
            )));
        }

        if self.id.chars().any(char::is_whitespace) {
            return Err(PackError::InvalidManifest(format!(
                "plugin ID '{}' must not contain whitespace",
                self.id
            )));
        }

        Ok(())
    }
}

/// Path of the manifest inside a plugin source directory.
#[must_use]
pub fn manifest_path(source_dir: impl AsRef<Path>) -> PathBuf {
    source_dir.as_ref().join(MANIFEST_FILE)
}

/// Load `<source_dir>/plugin.toml`.
///
/// Any I/O or parse error is reported as [`PackError::ManifestUnreadable`].
pub fn load_manifest(source_dir: impl AsRef<Path>) -> PackResult<PluginManifest> {
    PluginManifest::from_file(manifest_path(source_dir))
}

#[cfg(test)]
#[path = "manifest/manifest_tests.rs"]
mod manifest_tests;
