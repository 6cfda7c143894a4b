//! Packager configuration
//!
//! An optional TOML file supplies defaults for the output directory, the
//! target selection and the external tools:
//!
//! ```toml
//! output_dir = "/srv/marketplace"
//! targets = ["linux/amd64", "windows/amd64"]
//!
//! [tools]
//! compiler = "go"
//! strip = "strip"
//! compressor = "xz"
//! ```
//!
//! A relative `output_dir` is resolved against the directory holding the
//! file, so `output_dir = "dist"` in `<plugin>/iglu-pack.toml` means
//! `<plugin>/dist`.

use crate::{BuildTarget, PackError, PackResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::path::{Path, PathBuf};

/// Compiler backend used for cross-compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    /// `go build`, target selected through `GOOS`/`GOARCH`.
    #[default]
    Go,
    /// `cargo build --release`, target selected through `CARGO_BUILD_TARGET`.
    Cargo,
}

impl CompilerKind {
    /// Default program for this backend.
    #[must_use]
    pub fn default_program(&self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Cargo => "cargo",
        }
    }
}

impl FromStr for CompilerKind {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "go" => Ok(Self::Go),
            "cargo" => Ok(Self::Cargo),
            _ => Err(PackError::Config(format!(
                "unknown compiler '{s}', expected 'go' or 'cargo'"
            ))),
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_program())
    }
}

/// External tools invoked by the system toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Compiler backend.
    pub compiler: CompilerKind,

    /// Compiler program; defaults to the backend's own name.
    pub compiler_program: Option<String>,

    /// Symbol stripping program.
    pub strip: Option<String>,

    /// Set to `false` to skip the strip step.
    pub strip_enabled: bool,

    /// Single-file compressor, invoked as `<compressor> -f <file>`.
    pub compressor: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: CompilerKind::default(),
            compiler_program: None,
            strip: Some("strip".to_string()),
            strip_enabled: true,
            compressor: "xz".to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Program used for the compile step.
    #[must_use]
    pub fn compiler_program(&self) -> &str {
        self.compiler_program
            .as_deref()
            .unwrap_or_else(|| self.compiler.default_program())
    }

    /// Program used for the strip step, if the step is enabled.
    #[must_use]
    pub fn strip_program(&self) -> Option<&str> {
        if self.strip_enabled {
            self.strip.as_deref().filter(|s| !s.is_empty())
        } else {
            None
        }
    }
}

/// Contents of the packager configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
    /// Default output directory.
    pub output_dir: Option<PathBuf>,

    /// Default target selection.
    pub targets: Vec<BuildTarget>,

    /// External tool settings.
    pub tools: ToolchainConfig,
}

impl PackagerConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `output_dir` is taken relative to the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> PackResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PackError::Config(format!("cannot read {}: {e}", path.display())))?;

        let mut config = Self::from_toml(&content)
            .map_err(|e| PackError::Config(format!("cannot parse {}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            config.output_dir = config.output_dir.map(|dir| {
                if dir.is_relative() { base.join(dir) } else { dir }
            });
        }

        Ok(config)
    }

    /// Parse configuration from TOML text. Empty text yields the defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Targets to build when the caller selects none explicitly.
    #[must_use]
    pub fn default_targets(&self) -> Vec<BuildTarget> {
        if self.targets.is_empty() {
            BuildTarget::defaults().to_vec()
        } else {
            self.targets.clone()
        }
    }
}
