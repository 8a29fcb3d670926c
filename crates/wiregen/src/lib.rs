//! # wiregen
//!
//! CLI facade over [`wiregen_core`]: reads a YAML service-graph
//! description, detects the target Go package, and writes the generated
//! dependency-injection container source file.
//!
//! The run is one batch pass. Any configuration error (unknown service
//! reference, invalid scope, unparseable document) aborts the invocation
//! before the output file is touched.

use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wiregen_core::load;

/// Initializes logging from the `WIREGEN_LOG` environment variable,
/// defaulting to warnings only.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("WIREGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Runs one generation pass: load, validate, synthesize, emit, write.
///
/// `package` overrides the sibling-file package scan when given. The
/// output file is written only after the full source text has been
/// produced in memory, so a failed run leaves no partial output.
pub fn run(config: &Path, output: &Path, package: Option<&str>) -> anyhow::Result<()> {
    let description = load::load_description(config)
        .with_context(|| format!("reading description {}", config.display()))?;

    let package = match package {
        Some(name) => name.to_string(),
        None => load::detect_package_name(config)
            .with_context(|| format!("detecting package next to {}", config.display()))?,
    };

    let source = wiregen_core::generate(&description, &package)
        .with_context(|| format!("generating container for package {package}"))?;

    fs::write(output, source)
        .with_context(|| format!("writing output {}", output.display()))?;

    info!(
        output = %output.display(),
        package = %package,
        "container generated"
    );
    Ok(())
}
