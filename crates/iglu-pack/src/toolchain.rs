//! External build tools.
//!
//! The packager talks to the compiler, the symbol stripper and the
//! compressor through the [`Toolchain`] trait. [`SystemToolchain`] runs the
//! real programs; tests substitute their own implementation.

use crate::{BuildTarget, CompilerKind, ToolchainConfig};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// An external tool could not be started or exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Program that was run.
    pub program: String,
    /// Exit code, `None` if the program never started or was killed.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr, or the spawn error.
    pub output: String,
}

impl ToolFailure {
    /// Failure that is not tied to a process exit (spawn or I/O error).
    pub fn new(program: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_code: None,
            output: output.into(),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} exited with code {code}", self.program)?,
            None => write!(f, "{} failed", self.program)?,
        }
        let output = self.output.trim_end();
        if !output.is_empty() {
            write!(f, ": {output}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolFailure {}

/// Compiler, stripper and compressor used by the packager.
pub trait Toolchain {
    /// Cross-compile the plugin in `source_dir` for `target`, writing a
    /// single executable to `output_path`.
    fn compile(
        &self,
        source_dir: &Path,
        target: BuildTarget,
        output_path: &Path,
    ) -> Result<(), ToolFailure>;

    /// Remove debug symbols from `binary` in place.
    fn strip(&self, binary: &Path) -> Result<(), ToolFailure>;

    /// Compress `binary` in place, leaving `<binary>.xz` and removing the
    /// original.
    fn compress(&self, binary: &Path) -> Result<(), ToolFailure>;
}

/// Toolchain backed by the programs on this machine.
#[derive(Debug, Clone, Default)]
pub struct SystemToolchain {
    config: ToolchainConfig,
}

impl SystemToolchain {
    #[must_use]
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    fn compile_go(
        &self,
        source_dir: &Path,
        target: BuildTarget,
        output_path: &Path,
    ) -> Result<(), ToolFailure> {
        let program = self.config.compiler_program();
        // The compiler runs inside the source directory
        let output_path = absolute(program, output_path)?;

        let mut cmd = Command::new(program);
        cmd.arg("build")
            .arg("-o")
            .arg(&output_path)
            .current_dir(source_dir)
            .env("GOOS", target.os())
            .env("GOARCH", target.arch());

        run_captured(&mut cmd)
    }

    fn compile_cargo(
        &self,
        source_dir: &Path,
        target: BuildTarget,
        output_path: &Path,
    ) -> Result<(), ToolFailure> {
        let program = self.config.compiler_program();
        let target_dir = absolute(program, &source_dir.join("target"))?;

        let mut cmd = Command::new(program);
        cmd.arg("build")
            .arg("--release")
            .current_dir(source_dir)
            .env("CARGO_BUILD_TARGET", target.rust_target())
            .env("CARGO_TARGET_DIR", &target_dir);

        run_captured(&mut cmd)?;

        // Cargo names the executable after the bin target, which the
        // output path already encodes.
        let binary_name = output_path
            .file_name()
            .ok_or_else(|| ToolFailure::new(program, "output path has no file name"))?;
        let built = target_dir
            .join(target.rust_target())
            .join("release")
            .join(binary_name);

        std::fs::copy(&built, output_path).map_err(|e| {
            ToolFailure::new(
                program,
                format!("cannot copy {} to {}: {e}", built.display(), output_path.display()),
            )
        })?;

        Ok(())
    }
}

impl Toolchain for SystemToolchain {
    fn compile(
        &self,
        source_dir: &Path,
        target: BuildTarget,
        output_path: &Path,
    ) -> Result<(), ToolFailure> {
        match self.config.compiler {
            CompilerKind::Go => self.compile_go(source_dir, target, output_path),
            CompilerKind::Cargo => self.compile_cargo(source_dir, target, output_path),
        }
    }

    fn strip(&self, binary: &Path) -> Result<(), ToolFailure> {
        match self.config.strip_program() {
            Some(program) => run_captured(Command::new(program).arg(binary)),
            None => Ok(()),
        }
    }

    fn compress(&self, binary: &Path) -> Result<(), ToolFailure> {
        run_captured(Command::new(&self.config.compressor).arg("-f").arg(binary))
    }
}

/// Run a command to completion, capturing stdout and stderr.
///
/// Blocks until the process exits. A spawn error or non-zero exit becomes a
/// [`ToolFailure`] carrying the combined output.
pub fn run_captured(cmd: &mut Command) -> Result<(), ToolFailure> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!("Running {:?}", cmd);

    let output = cmd
        .output()
        .map_err(|e| ToolFailure::new(&program, format!("failed to execute: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ToolFailure {
            program,
            exit_code: output.status.code(),
            output: combined_output(&output),
        })
    }
}

fn absolute(program: &str, path: &Path) -> Result<PathBuf, ToolFailure> {
    std::path::absolute(path).map_err(|e| {
        ToolFailure::new(program, format!("cannot resolve {}: {e}", path.display()))
    })
}

/// Stdout followed by stderr, lossily decoded.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
