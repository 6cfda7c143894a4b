//! Multi-platform packaging for iglu plugins
//!
//! This crate cross-compiles a plugin for a set of [`BuildTarget`]s and turns
//! each build into a compressed, checksummed artifact next to a copy of the
//! plugin manifest.
//!
//! # Output Layout
//!
//! ```text
//! <output>/
//! ├── linux-amd64/
//! │   ├── demo.xz
//! │   ├── demo.xz.sha256sum
//! │   └── demo.toml
//! └── windows-amd64/
//!     ├── demo.exe.xz
//!     ├── demo.exe.xz.sha256sum
//!     └── demo.toml
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iglu_pack::{BuildTarget, PackageJob, Packager, SystemToolchain, ToolchainConfig};
//!
//! let job = PackageJob::new("my-plugin", "dist")
//!     .with_targets([BuildTarget::LinuxAmd64, BuildTarget::WindowsAmd64]);
//!
//! let packager = Packager::new(SystemToolchain::new(ToolchainConfig::default()));
//! let report = packager.package(&job)?;
//!
//! for result in &report.results {
//!     println!("{}: {}", result.target, result.status);
//! }
//! # Ok::<(), iglu_pack::PackError>(())
//! ```

mod artifact;
mod error;
mod job;
mod manifest;
mod target;

pub mod checksum;
pub mod config;
pub mod packager;
pub mod toolchain;

pub use artifact::ArtifactSet;
pub use config::{CompilerKind, PackagerConfig, ToolchainConfig};
pub use error::{PackError, StepError};
pub use job::PackageJob;
pub use manifest::{PluginManifest, load_manifest};
pub use packager::{PackageReport, Packager, TargetResult, TargetStatus};
pub use target::BuildTarget;
pub use toolchain::{SystemToolchain, ToolFailure, Toolchain};

/// Result type for packaging operations.
pub type PackResult<T> = Result<T, PackError>;

/// Manifest file name inside a plugin source directory.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Extension appended by the compressor.
pub const COMPRESSED_EXTENSION: &str = "xz";

/// Extension of the checksum sidecar.
pub const CHECKSUM_EXTENSION: &str = "sha256sum";

/// Environment variable naming the default output directory.
pub const OUTPUT_DIR_ENV: &str = "IGLU_MARKETPLACE";
