//! Manifest display and validation

use anyhow::{Context, Result};
use iglu_pack::{MANIFEST_FILE, PluginManifest};
use std::path::{Path, PathBuf};

/// Manifest fields as shown to the user.
///
/// A failed load keeps whatever was shown before (empty on first load).
#[derive(Debug, Default)]
pub struct ManifestView {
    pub manifest: PluginManifest,
    pub loaded: bool,
}

impl ManifestView {
    /// Reload from `source`, keeping the previous fields on failure.
    pub fn refresh(&mut self, source: &Path) {
        match self.manifest.reload_from(source) {
            Ok(()) => self.loaded = true,
            Err(e) => {
                tracing::warn!("{e}");
                self.loaded = false;
            }
        }
    }

    fn print(&self) {
        println!("ID:      {}", self.manifest.id);
        println!("Name:    {}", self.manifest.name);
        println!("Author:  {}", self.manifest.author);
        println!("Version: {}", self.manifest.version);
    }
}

/// Check command implementation
pub fn check(source: Option<PathBuf>) -> Result<()> {
    let source = source.unwrap_or_else(|| PathBuf::from("."));

    println!("Checking manifest: {}", source.join(MANIFEST_FILE).display());

    let mut view = ManifestView::default();
    view.refresh(&source);
    view.print();

    if !view.loaded {
        println!("\nCannot load {MANIFEST_FILE} manifest!");
        return Ok(());
    }

    view.manifest
        .validate()
        .with_context(|| format!("{} is not valid", source.join(MANIFEST_FILE).display()))?;

    println!("\nManifest is valid!");

    Ok(())
}
