//! iglu-pack CLI - Multi-platform plugin packager
//!
//! Commands:
//! - `iglu-pack package` - Build, compress and checksum a plugin for each target
//! - `iglu-pack check` - Show and validate a plugin.toml manifest
//! - `iglu-pack targets` - List known targets
//! - `iglu-pack verify` - Verify checksum sidecars in an output directory

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod logging;
mod manifest;
mod package;
mod targets;
mod verify;

#[derive(Parser)]
#[command(name = "iglu-pack")]
#[command(author, version, about = "Packager for iglu plugins", long_about = None)]
struct Cli {
    /// Log more (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log less (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and package a plugin for every selected target
    Package(package::PackageArgs),

    /// Show and validate a plugin.toml manifest
    Check {
        /// Plugin source directory (default: current directory)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// List known targets
    Targets,

    /// Verify every checksum sidecar below a directory
    Verify {
        /// Output directory produced by `iglu-pack package`
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Package(args) => {
            package::run(args)?;
        }
        Commands::Check { source } => {
            manifest::check(source)?;
        }
        Commands::Targets => {
            targets::run();
        }
        Commands::Verify { dir } => {
            verify::run(&dir)?;
        }
    }

    Ok(())
}
