//! Packaging job description.

use crate::BuildTarget;
use std::path::{Path, PathBuf};

/// One packaging run: where the plugin lives, where artifacts go, and
/// which targets to build.
///
/// Built once by the caller and handed to the packager by reference.
/// Targets keep the order they were selected in; selecting a target twice
/// has no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageJob {
    source_directory: PathBuf,
    output_directory: PathBuf,
    selected_targets: Vec<BuildTarget>,
}

impl PackageJob {
    /// Create a job with no targets selected.
    pub fn new(source_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            source_directory: source_directory.into(),
            output_directory: output_directory.into(),
            selected_targets: Vec::new(),
        }
    }

    /// Select targets, appending to any already selected.
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = BuildTarget>) -> Self {
        for target in targets {
            if !self.selected_targets.contains(&target) {
                self.selected_targets.push(target);
            }
        }
        self
    }

    /// Plugin source directory.
    #[must_use]
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// Root output directory.
    #[must_use]
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Selected targets in selection order.
    #[must_use]
    pub fn selected_targets(&self) -> &[BuildTarget] {
        &self.selected_targets
    }
}
