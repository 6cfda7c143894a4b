//! Checksum verification command

use anyhow::{Context, Result};
use iglu_pack::CHECKSUM_EXTENSION;
use iglu_pack::checksum::verify_checksum_file;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Verify every `.sha256sum` sidecar below `dir`.
pub fn run(dir: &Path) -> Result<()> {
    let sidecars = find_sidecars(dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    if sidecars.is_empty() {
        anyhow::bail!("No .{CHECKSUM_EXTENSION} files found in {}", dir.display());
    }

    let mut failures = 0;
    for sidecar in &sidecars {
        match verify_checksum_file(sidecar) {
            Ok(artifact) => println!("✓ {}", artifact.display()),
            Err(e) => {
                println!("✗ {}: {e}", sidecar.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} checksum(s) did not verify", sidecars.len());
    }

    println!("\nAll {} checksum(s) verified", sidecars.len());
    Ok(())
}

/// Collect sidecar files recursively, sorted for stable output.
///
/// Symlinks are not followed, so a link back into the tree cannot make the
/// walk revisit a directory.
fn find_sidecars(dir: &Path) -> walkdir::Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == CHECKSUM_EXTENSION)
        {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
