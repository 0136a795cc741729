//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Create or overwrite a file with the given bytes.
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed writing to destination: {}", path.display()))
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// List the Go source files directly inside `dir`, skipping `_test.go` files.
pub fn go_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut results = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to read directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".go") && !name.ends_with("_test.go") {
            results.push(entry.into_path());
        }
    }

    results.sort();
    Ok(results)
}
