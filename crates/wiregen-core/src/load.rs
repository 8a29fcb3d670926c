//! Input glue: description loading and target-package detection
//!
//! Thin collaborators around the compiler core: read the YAML description
//! document from disk, and locate the Go package name the generated file
//! should declare by scanning the description's sibling sources.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::graph::Description;

/// Matches a Go package clause at the start of a line.
static PACKAGE_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^package\s+(\w+)").unwrap());

/// Loads and deserializes the description document.
pub fn load_description(path: &Path) -> Result<Description> {
    let text = fs::read_to_string(path)?;
    let description: Description = serde_yaml::from_str(&text)?;
    debug!(
        path = %path.display(),
        services = description.services.len(),
        "loaded description"
    );
    Ok(description)
}

/// Detects the package name for the generated file.
///
/// The directory name alone is not enough (it may hold a command, package
/// `main`), so the first non-test `.go` file next to the description is
/// read and its package clause parsed. Files are visited in name order
/// for determinism. Falls back to `main` when nothing matches.
pub fn detect_package_name(description_path: &Path) -> Result<String> {
    let dir = match description_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".go") || name.ends_with("_test.go") {
            continue;
        }

        let source = fs::read_to_string(path)?;
        if let Some(caps) = PACKAGE_CLAUSE.captures(&source) {
            let package = caps[1].to_string();
            debug!(file = %path.display(), package = %package, "detected package");
            return Ok(package);
        }
    }

    Ok("main".to_string())
}
