//! SHA-256 checksums and `sha256sum`-style sidecar files.
//!
//! A sidecar holds one line, `<hex-digest>  <file-name>`, where the file
//! name is relative to the sidecar's directory. `sha256sum -c` run from
//! that directory accepts it.

use crate::{PackError, PackResult};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Hash a file in 8KB chunks and return the hex digest.
pub fn sha256_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Format one sidecar line.
#[must_use]
pub fn checksum_line(digest: &str, file_name: &str) -> String {
    format!("{digest}  {file_name}\n")
}

/// Hash `artifact` and write its sidecar to `sidecar`.
///
/// Returns the hex digest.
pub fn write_checksum_file(artifact: &Path, sidecar: &Path) -> std::io::Result<String> {
    let digest = sha256_file(artifact)?;
    let file_name = artifact
        .file_name()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", artifact.display()),
            )
        })?
        .to_string_lossy();

    fs::write(sidecar, checksum_line(&digest, &file_name))?;
    Ok(digest)
}

/// Split a sidecar line into digest and file name.
///
/// Accepts the binary-mode marker (`*name`) that `sha256sum -b` writes.
#[must_use]
pub fn parse_checksum_line(line: &str) -> Option<(&str, &str)> {
    let (digest, rest) = line.trim_end().split_once(char::is_whitespace)?;
    let name = rest.trim_start();
    let name = name.strip_prefix('*').unwrap_or(name);

    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) || name.is_empty() {
        return None;
    }

    Some((digest, name))
}

/// Re-hash the file a sidecar names and compare digests.
///
/// Returns the path of the verified artifact.
pub fn verify_checksum_file(sidecar: impl AsRef<Path>) -> PackResult<PathBuf> {
    let sidecar = sidecar.as_ref();
    let content = fs::read_to_string(sidecar)?;
    let line = content.lines().next().unwrap_or_default();

    let (expected, name) = parse_checksum_line(line)
        .ok_or_else(|| PackError::MalformedChecksum(sidecar.to_path_buf()))?;

    let artifact = sidecar
        .parent()
        .map_or_else(|| PathBuf::from(name), |dir| dir.join(name));
    let actual = sha256_file(&artifact)?;

    if !actual.eq_ignore_ascii_case(expected) {
        return Err(PackError::ChecksumMismatch {
            path: artifact.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(artifact)
}
