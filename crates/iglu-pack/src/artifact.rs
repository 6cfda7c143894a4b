//! Artifact path derivation.

use crate::{BuildTarget, CHECKSUM_EXTENSION, COMPRESSED_EXTENSION};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths of every file the pipeline writes for one target.
///
/// Derived purely from the output directory, the target and the plugin id.
/// Each target gets its own `<os>-<arch>` directory, so two targets never
/// share a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    /// Per-target directory.
    pub directory: PathBuf,
    /// Uncompressed executable; removed once compression succeeds.
    pub binary_path: PathBuf,
    /// Compressed executable.
    pub compressed_path: PathBuf,
    /// Copy of the plugin manifest.
    pub manifest_copy_path: PathBuf,
    /// SHA-256 sidecar of the compressed executable.
    pub checksum_path: PathBuf,
}

impl ArtifactSet {
    /// Derive the artifact paths for `target`.
    #[must_use]
    pub fn derive(output_directory: &Path, target: BuildTarget, plugin_id: &str) -> Self {
        let directory = output_directory.join(target.key());
        let binary_name = target.executable_name(plugin_id);
        let compressed_name = format!("{binary_name}.{COMPRESSED_EXTENSION}");
        let checksum_name = format!("{compressed_name}.{CHECKSUM_EXTENSION}");

        Self {
            binary_path: directory.join(&binary_name),
            compressed_path: directory.join(&compressed_name),
            manifest_copy_path: directory.join(format!("{plugin_id}.toml")),
            checksum_path: directory.join(checksum_name),
            directory,
        }
    }

    /// Every file path in the set, in pipeline order.
    #[must_use]
    pub fn files(&self) -> [&Path; 4] {
        [
            self.binary_path.as_path(),
            self.compressed_path.as_path(),
            self.manifest_copy_path.as_path(),
            self.checksum_path.as_path(),
        ]
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn ArtifactSet___derive___linux_layout() {
        let set = ArtifactSet::derive(Path::new("/dist"), BuildTarget::LinuxAmd64, "demo");

        assert_eq!(set.directory, Path::new("/dist/linux-amd64"));
        assert_eq!(set.binary_path, Path::new("/dist/linux-amd64/demo"));
        assert_eq!(set.compressed_path, Path::new("/dist/linux-amd64/demo.xz"));
        assert_eq!(set.manifest_copy_path, Path::new("/dist/linux-amd64/demo.toml"));
        assert_eq!(
            set.checksum_path,
            Path::new("/dist/linux-amd64/demo.xz.sha256sum")
        );
    }

    #[test]
    fn ArtifactSet___derive___windows_layout_carries_exe() {
        let set = ArtifactSet::derive(Path::new("/dist"), BuildTarget::WindowsAmd64, "demo");

        assert_eq!(set.binary_path, Path::new("/dist/windows-amd64/demo.exe"));
        assert_eq!(
            set.compressed_path,
            Path::new("/dist/windows-amd64/demo.exe.xz")
        );
        assert_eq!(
            set.manifest_copy_path,
            Path::new("/dist/windows-amd64/demo.toml")
        );
        assert_eq!(
            set.checksum_path,
            Path::new("/dist/windows-amd64/demo.exe.xz.sha256sum")
        );
    }

    #[test]
    fn ArtifactSet___files___lists_all_four_paths() {
        let set = ArtifactSet::derive(Path::new("out"), BuildTarget::DarwinAmd64, "demo");

        let files = set.files();
        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|p| p.starts_with(&set.directory)));
    }
}
