//! Cross-compilation target identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported cross-compilation targets.
///
/// Names follow the toolchain selector convention (`GOOS`/`GOARCH`), so
/// `amd64` rather than `x86_64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildTarget {
    /// Linux on amd64.
    LinuxAmd64,
    /// Linux on ARM64.
    LinuxArm64,
    /// macOS on amd64 (Intel).
    DarwinAmd64,
    /// macOS on ARM64 (Apple Silicon).
    DarwinArm64,
    /// Windows on amd64.
    WindowsAmd64,
    /// Windows on ARM64.
    WindowsArm64,
}

impl BuildTarget {
    /// Operating system selector (e.g., "linux").
    #[must_use]
    pub fn os(&self) -> &'static str {
        match self {
            Self::LinuxAmd64 | Self::LinuxArm64 => "linux",
            Self::DarwinAmd64 | Self::DarwinArm64 => "darwin",
            Self::WindowsAmd64 | Self::WindowsArm64 => "windows",
        }
    }

    /// Architecture selector (e.g., "amd64").
    #[must_use]
    pub fn arch(&self) -> &'static str {
        match self {
            Self::LinuxAmd64 | Self::DarwinAmd64 | Self::WindowsAmd64 => "amd64",
            Self::LinuxArm64 | Self::DarwinArm64 | Self::WindowsArm64 => "arm64",
        }
    }

    /// Output directory key (e.g., "linux-amd64").
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::LinuxAmd64 => "linux-amd64",
            Self::LinuxArm64 => "linux-arm64",
            Self::DarwinAmd64 => "darwin-amd64",
            Self::DarwinArm64 => "darwin-arm64",
            Self::WindowsAmd64 => "windows-amd64",
            Self::WindowsArm64 => "windows-arm64",
        }
    }

    /// Parse a target from `os/arch` or `os-arch` form.
    ///
    /// Matching is exact: lowercase, no surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (os, arch) = s.split_once('/').or_else(|| s.split_once('-'))?;
        Self::all()
            .iter()
            .copied()
            .find(|t| t.os() == os && t.arch() == arch)
    }

    /// Whether this target produces Windows executables.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os() == "windows"
    }

    /// Suffix carried by executables for this target.
    #[must_use]
    pub fn executable_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Format an executable name for this target.
    ///
    /// # Example
    ///
    /// ```
    /// use iglu_pack::BuildTarget;
    ///
    /// assert_eq!(BuildTarget::LinuxAmd64.executable_name("demo"), "demo");
    /// assert_eq!(BuildTarget::WindowsAmd64.executable_name("demo"), "demo.exe");
    /// ```
    #[must_use]
    pub fn executable_name(&self, base_name: &str) -> String {
        format!("{base_name}{}", self.executable_suffix())
    }

    /// Get the Rust target triple for this target.
    #[must_use]
    pub fn rust_target(&self) -> &'static str {
        match self {
            Self::LinuxAmd64 => "x86_64-unknown-linux-gnu",
            Self::LinuxArm64 => "aarch64-unknown-linux-gnu",
            Self::DarwinAmd64 => "x86_64-apple-darwin",
            Self::DarwinArm64 => "aarch64-apple-darwin",
            Self::WindowsAmd64 => "x86_64-pc-windows-gnu",
            Self::WindowsArm64 => "aarch64-pc-windows-gnullvm",
        }
    }

    /// Get all known targets.
    #[must_use]
    pub fn all() -> &'static [BuildTarget] {
        &[
            Self::LinuxAmd64,
            Self::LinuxArm64,
            Self::DarwinAmd64,
            Self::DarwinArm64,
            Self::WindowsAmd64,
            Self::WindowsArm64,
        ]
    }

    /// Targets selected when the caller names none.
    #[must_use]
    pub fn defaults() -> &'static [BuildTarget] {
        &[
            Self::LinuxAmd64,
            Self::LinuxArm64,
            Self::WindowsAmd64,
            Self::DarwinAmd64,
        ]
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os(), self.arch())
    }
}

impl TryFrom<String> for BuildTarget {
    type Error = crate::PackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(crate::PackError::InvalidTarget(value))
    }
}

impl From<BuildTarget> for String {
    fn from(target: BuildTarget) -> Self {
        target.key().to_string()
    }
}

impl std::str::FromStr for BuildTarget {
    type Err = crate::PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::PackError::InvalidTarget(s.to_string()))
    }
}
