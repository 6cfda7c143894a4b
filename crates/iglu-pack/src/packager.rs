//! The build-and-package pipeline.
//!
//! For every selected target, in selection order:
//!
//! 1. compile the plugin into `<output>/<os>-<arch>/<id>[.exe]`
//! 2. strip debug symbols (best effort)
//! 3. compress the executable in place to `<id>[.exe].xz`
//! 4. copy `plugin.toml` to `<id>.toml`
//! 5. write `<id>[.exe].xz.sha256sum`
//!
//! A failing mandatory step ends that target; the next target still runs.

use crate::checksum::write_checksum_file;
use crate::manifest::manifest_path;
use crate::{
    ArtifactSet, BuildTarget, PackError, PackResult, PackageJob, PluginManifest, StepError,
    SystemToolchain, Toolchain, load_manifest,
};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Outcome of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum TargetStatus {
    /// Every mandatory step completed.
    Success,
    /// The first mandatory step that failed.
    Failed(StepError),
}

impl TargetStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("ok"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Result entry for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetResult {
    pub target: BuildTarget,
    pub artifacts: ArtifactSet,
    #[serde(flatten)]
    pub status: TargetStatus,
}

/// Results of a packaging run, one entry per selected target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    /// Manifest the artifacts were named from. Empty when no target ran.
    pub manifest: PluginManifest,
    pub results: Vec<TargetResult>,
}

impl PackageReport {
    /// Whether every target succeeded (vacuously true for no targets).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.status.is_success())
    }

    /// Targets that completed.
    pub fn succeeded(&self) -> impl Iterator<Item = &TargetResult> {
        self.results.iter().filter(|r| r.status.is_success())
    }

    /// Targets that failed.
    pub fn failed(&self) -> impl Iterator<Item = &TargetResult> {
        self.results.iter().filter(|r| !r.status.is_success())
    }

    /// Result for a given target, if it was selected.
    #[must_use]
    pub fn result_for(&self, target: BuildTarget) -> Option<&TargetResult> {
        self.results.iter().find(|r| r.target == target)
    }
}

/// Runs the pipeline with a given toolchain.
#[derive(Debug, Clone, Default)]
pub struct Packager<T: Toolchain = SystemToolchain> {
    toolchain: T,
}

impl<T: Toolchain> Packager<T> {
    pub fn new(toolchain: T) -> Self {
        Self { toolchain }
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Package every selected target of `job`.
    ///
    /// Fails as a whole only when nothing can be built: the manifest is
    /// unreadable or invalid, or the output directory cannot be created.
    /// Per-target failures are recorded in the report.
    pub fn package(&self, job: &PackageJob) -> PackResult<PackageReport> {
        if job.selected_targets().is_empty() {
            info!("No targets selected, nothing to package");
            return Ok(PackageReport::default());
        }

        let manifest = load_manifest(job.source_directory())?;
        manifest.validate()?;

        let output_dir = job.output_directory();
        fs::create_dir_all(output_dir).map_err(|source| PackError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        info!(
            "Packaging {} v{} for {} target(s) into {}",
            manifest.id,
            manifest.version,
            job.selected_targets().len(),
            output_dir.display()
        );

        let mut results = Vec::with_capacity(job.selected_targets().len());
        for &target in job.selected_targets() {
            let artifacts = ArtifactSet::derive(output_dir, target, &manifest.id);

            let status = match self.package_target(job.source_directory(), target, &artifacts) {
                Ok(()) => {
                    info!("{target}: done");
                    TargetStatus::Success
                }
                Err(e) => {
                    error!("{target}: {e}");
                    TargetStatus::Failed(e)
                }
            };

            results.push(TargetResult {
                target,
                artifacts,
                status,
            });
        }

        Ok(PackageReport { manifest, results })
    }

    fn package_target(
        &self,
        source_dir: &Path,
        target: BuildTarget,
        artifacts: &ArtifactSet,
    ) -> Result<(), StepError> {
        prepare_directory(artifacts)?;

        info!("{target}: building binary");
        self.toolchain
            .compile(source_dir, target, &artifacts.binary_path)
            .map_err(|e| StepError::CompileFailed(e.to_string()))?;

        info!("{target}: stripping binary");
        if let Err(e) = self.toolchain.strip(&artifacts.binary_path) {
            warn!("{target}: strip failed, keeping unstripped binary: {e}");
        }

        info!("{target}: compressing binary");
        self.toolchain
            .compress(&artifacts.binary_path)
            .map_err(|e| StepError::CompressionFailed(e.to_string()))?;

        info!("{target}: copying manifest");
        copy_manifest(source_dir, &artifacts.manifest_copy_path)?;

        info!("{target}: calculating sha256sum");
        write_checksum_file(&artifacts.compressed_path, &artifacts.checksum_path).map_err(|e| {
            StepError::ChecksumFailed(format!(
                "{}: {e}",
                artifacts.compressed_path.display()
            ))
        })?;

        Ok(())
    }
}

/// Create the target directory and clear artifacts from an earlier run.
fn prepare_directory(artifacts: &ArtifactSet) -> Result<(), StepError> {
    fs::create_dir_all(&artifacts.directory).map_err(|e| {
        StepError::PrepareFailed(format!("{}: {e}", artifacts.directory.display()))
    })?;

    for path in artifacts.files() {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StepError::PrepareFailed(format!(
                    "cannot remove stale {}: {e}",
                    path.display()
                )));
            }
        }
    }

    Ok(())
}

fn copy_manifest(source_dir: &Path, destination: &Path) -> Result<(), StepError> {
    let source = manifest_path(source_dir);
    let data = fs::read(&source).map_err(|e| {
        StepError::ManifestCopyFailed(format!("loading {} failed: {e}", source.display()))
    })?;

    fs::write(destination, data).map_err(|e| {
        StepError::ManifestCopyFailed(format!("saving {} failed: {e}", destination.display()))
    })
}
