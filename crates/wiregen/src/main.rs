//! wiregen - entry point
//!
//! Binary entry point for the container generator. Parses the CLI and
//! dispatches to [`wiregen::run`].

use clap::Parser;
use std::path::PathBuf;

/// Command line interface for wiregen
#[derive(Parser, Debug)]
#[command(name = "wiregen")]
#[command(about = "Compile a YAML service graph into a Go dependency-injection container")]
#[command(version)]
pub struct Cli {
    /// Path to the service-graph description
    #[arg(short, long, default_value = "wiregen.yml")]
    pub config: PathBuf,

    /// Path of the generated Go source file
    #[arg(short, long, default_value = "wiregen.go")]
    pub output: PathBuf,

    /// Target package name; detected from sibling .go files when omitted
    #[arg(short, long)]
    pub package: Option<String>,
}

fn main() -> anyhow::Result<()> {
    wiregen::init_logging();
    let cli = Cli::parse();
    wiregen::run(&cli.config, &cli.output, cli.package.as_deref())
}
