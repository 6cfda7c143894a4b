//! Package command implementation

use anyhow::{Context, Result};
use clap::Args;
use iglu_pack::{
    BuildTarget, CompilerKind, OUTPUT_DIR_ENV, PackageJob, PackageReport, Packager,
    PackagerConfig, SystemToolchain, TargetStatus,
};
use std::path::{Path, PathBuf};

/// Config file picked up from the plugin source directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "iglu-pack.toml";

#[derive(Debug, Args)]
pub struct PackageArgs {
    /// Plugin source directory containing plugin.toml (default: current directory)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory; one sub-directory per target is created inside
    #[arg(short, long, env = OUTPUT_DIR_ENV)]
    pub output: Option<PathBuf>,

    /// Target to build, as os/arch (repeatable; default: linux/amd64,
    /// linux/arm64, windows/amd64, darwin/amd64)
    #[arg(short, long = "target", value_name = "OS/ARCH")]
    pub targets: Vec<BuildTarget>,

    /// Build every known target
    #[arg(long, conflicts_with = "targets")]
    pub all_targets: bool,

    /// Compiler backend: go or cargo
    #[arg(long, value_name = "go|cargo")]
    pub compiler: Option<CompilerKind>,

    /// Skip the strip step
    #[arg(long)]
    pub no_strip: bool,

    /// Packager config file (default: <source>/iglu-pack.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the package command
pub fn run(args: PackageArgs) -> Result<()> {
    let source = args.source.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(args.config.as_deref(), &source)?;
    let job = resolve_job(&args, &config, source)?;

    let mut tools = config.tools.clone();
    if let Some(compiler) = args.compiler {
        tools.compiler = compiler;
    }
    if args.no_strip {
        tools.strip_enabled = false;
    }

    println!(
        "Packaging {} into {}",
        job.source_directory().display(),
        job.output_directory().display()
    );

    let packager = Packager::new(SystemToolchain::new(tools));
    let report = packager
        .package(&job)
        .with_context(|| format!("Failed to package {}", job.source_directory().display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} target(s) failed",
            report.results.len()
        );
    }

    Ok(())
}

/// Load the explicit config file, or `<source>/iglu-pack.toml` if present.
fn load_config(explicit: Option<&Path>, source: &Path) -> Result<PackagerConfig> {
    if let Some(path) = explicit {
        return Ok(PackagerConfig::from_file(path)?);
    }

    let implicit = source.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        tracing::debug!("Using config file {}", implicit.display());
        return Ok(PackagerConfig::from_file(&implicit)?);
    }

    Ok(PackagerConfig::default())
}

/// Build the job from flags, falling back to the config file.
fn resolve_job(args: &PackageArgs, config: &PackagerConfig, source: PathBuf) -> Result<PackageJob> {
    let output = args
        .output
        .clone()
        .or_else(|| config.output_dir.clone())
        .with_context(|| {
            format!("No output directory: pass --output, set {OUTPUT_DIR_ENV}, or set output_dir in the config file")
        })?;

    let targets = if args.all_targets {
        BuildTarget::all().to_vec()
    } else if !args.targets.is_empty() {
        args.targets.clone()
    } else {
        config.default_targets()
    };

    Ok(PackageJob::new(source, output).with_targets(targets))
}

fn print_report(report: &PackageReport) {
    if report.results.is_empty() {
        println!("No targets selected.");
        return;
    }

    println!(
        "\n{} v{} by {}",
        report.manifest.name, report.manifest.version, report.manifest.author
    );
    for result in &report.results {
        match &result.status {
            TargetStatus::Success => {
                println!(
                    "  ✓ {:<14} {}",
                    result.target.to_string(),
                    result.artifacts.compressed_path.display()
                );
            }
            TargetStatus::Failed(e) => {
                println!("  ✗ {:<14} {} failed", result.target.to_string(), e.step());
                for line in e.output().lines() {
                    println!("      {line}");
                }
            }
        }
    }

    println!(
        "\n{} succeeded, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> PackageArgs {
        PackageArgs {
            source: None,
            output: None,
            targets: Vec::new(),
            all_targets: false,
            compiler: None,
            no_strip: false,
            config: None,
            json: false,
        }
    }

    #[derive(clap::Parser)]
    struct PackageCli {
        #[command(flatten)]
        args: PackageArgs,
    }

    fn parse(argv: &[&str]) -> Result<PackageArgs, clap::Error> {
        use clap::Parser;
        PackageCli::try_parse_from(std::iter::once("package").chain(argv.iter().copied()))
            .map(|cli| cli.args)
    }

    #[test]
    fn PackageArgs___compiler___parses_into_backend() {
        let args = parse(&["--compiler", "cargo", "-o", "out"]).unwrap();

        assert_eq!(args.compiler, Some(CompilerKind::Cargo));
    }

    #[test]
    fn PackageArgs___compiler___rejects_unknown_backend() {
        assert!(parse(&["--compiler", "make", "-o", "out"]).is_err());
    }

    #[test]
    fn PackageArgs___target___parses_both_separators() {
        let args = parse(&["-t", "linux/arm64", "-t", "windows-amd64", "-o", "out"]).unwrap();

        assert_eq!(
            args.targets,
            vec![BuildTarget::LinuxArm64, BuildTarget::WindowsAmd64]
        );
    }

    #[test]
    fn resolve_job___flag_output_beats_config() {
        let config = PackagerConfig {
            output_dir: Some(PathBuf::from("from-config")),
            ..PackagerConfig::default()
        };
        let args = PackageArgs {
            output: Some(PathBuf::from("from-flag")),
            ..args()
        };

        let job = resolve_job(&args, &config, PathBuf::from(".")).unwrap();

        assert_eq!(job.output_directory(), Path::new("from-flag"));
    }

    #[test]
    fn resolve_job___falls_back_to_config_output() {
        let config = PackagerConfig {
            output_dir: Some(PathBuf::from("from-config")),
            ..PackagerConfig::default()
        };

        let job = resolve_job(&args(), &config, PathBuf::from(".")).unwrap();

        assert_eq!(job.output_directory(), Path::new("from-config"));
    }

    #[test]
    fn resolve_job___no_output_anywhere___errors() {
        let result = resolve_job(&args(), &PackagerConfig::default(), PathBuf::from("."));

        assert!(result.is_err());
    }

    #[test]
    fn resolve_job___default_targets_when_none_selected() {
        let args = PackageArgs {
            output: Some(PathBuf::from("out")),
            ..args()
        };

        let job = resolve_job(&args, &PackagerConfig::default(), PathBuf::from(".")).unwrap();

        assert_eq!(job.selected_targets(), BuildTarget::defaults());
    }

    #[test]
    fn resolve_job___explicit_targets_keep_order() {
        let args = PackageArgs {
            output: Some(PathBuf::from("out")),
            targets: vec![BuildTarget::DarwinArm64, BuildTarget::LinuxAmd64],
            ..args()
        };
        let config = PackagerConfig {
            targets: vec![BuildTarget::WindowsAmd64],
            ..PackagerConfig::default()
        };

        let job = resolve_job(&args, &config, PathBuf::from(".")).unwrap();

        assert_eq!(
            job.selected_targets(),
            &[BuildTarget::DarwinArm64, BuildTarget::LinuxAmd64]
        );
    }

    #[test]
    fn resolve_job___all_targets_selects_everything() {
        let args = PackageArgs {
            output: Some(PathBuf::from("out")),
            all_targets: true,
            ..args()
        };

        let job = resolve_job(&args, &PackagerConfig::default(), PathBuf::from(".")).unwrap();

        assert_eq!(job.selected_targets(), BuildTarget::all());
    }

    #[test]
    fn load_config___reads_implicit_file_in_source() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "output_dir = \"dist\"\n",
        )
        .unwrap();

        let config = load_config(None, temp_dir.path()).unwrap();

        assert_eq!(config.output_dir, Some(temp_dir.path().join("dist")));
    }

    #[test]
    fn load_config___missing_explicit_file___errors() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_config(Some(&temp_dir.path().join("nope.toml")), temp_dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn load_config___nothing_found___uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = load_config(None, temp_dir.path()).unwrap();

        assert_eq!(config, PackagerConfig::default());
    }

    #[test]
    fn run___empty_source___fails_with_manifest_error() {
        let temp_dir = TempDir::new().unwrap();
        let args = PackageArgs {
            source: Some(temp_dir.path().to_path_buf()),
            output: Some(temp_dir.path().join("out")),
            targets: vec![BuildTarget::LinuxAmd64],
            ..args()
        };

        let err = run(args).unwrap_err();

        assert!(format!("{err:#}").contains("plugin.toml"));
    }
}
