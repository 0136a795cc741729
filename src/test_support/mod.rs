//! Test utilities for mockforge unit tests.
//!
//! The reflection pipeline shells out to `go` and then to the program it
//! builds. These helpers write small shell scripts that stand in for both,
//! so the pipeline can be exercised without a Go installation.
//!
//! # Example
//!
//! ```rust,ignore
//! let tools = TempDir::new().unwrap();
//! let go = fake_go(tools.path(), &reader_writer_package());
//! let extractor = ModelExtractor::new().with_go(Some(go));
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

pub use fixtures::*;

use crate::model::{wire, Package};

/// Sorted file names directly inside `dir`.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Write an executable `/bin/sh` script.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write `pkg` in wire format to `<dir>/payload.bin`.
pub fn write_payload(dir: &Path, pkg: &Package) -> PathBuf {
    let path = dir.join("payload.bin");
    std::fs::write(&path, wire::encode(pkg).unwrap()).unwrap();
    path
}

/// A prebuilt "introspection binary" that prints `pkg` in wire format.
#[cfg(unix)]
pub fn fake_introspection_binary(dir: &Path, pkg: &Package) -> PathBuf {
    let payload = write_payload(dir, pkg);
    write_script(dir, "introspect", &format!("cat '{}'", payload.display()))
}

/// A fake `go` whose `build -o OUT SRC` produces an executable running `body`.
#[cfg(unix)]
pub fn go_building_script(dir: &Path, body: &str) -> PathBuf {
    let program = write_script(dir, "built-program", body);
    write_script(
        dir,
        "go",
        &format!(
            "[ \"$1\" = build ] || exit 2\n\
             cp '{}' \"$3\" || exit 1\n\
             chmod +x \"$3\"",
            program.display()
        ),
    )
}

/// A fake `go` whose built program prints `pkg` in wire format.
#[cfg(unix)]
pub fn fake_go(dir: &Path, pkg: &Package) -> PathBuf {
    let payload = write_payload(dir, pkg);
    go_building_script(dir, &format!("cat '{}'", payload.display()))
}

/// A fake `go` that fails every build with the given diagnostic.
#[cfg(unix)]
pub fn failing_go(dir: &Path, diagnostic: &str) -> PathBuf {
    write_script(
        dir,
        "go",
        &format!("echo '{}' >&2\nexit 1", diagnostic),
    )
}

/// A fake `go` that fails the build, reporting the source lines matching
/// `pattern` as its diagnostic.
#[cfg(unix)]
pub fn grep_go(dir: &Path, pattern: &str) -> PathBuf {
    write_script(
        dir,
        "go",
        &format!("grep -n '{}' \"$4\" >&2\nexit 1", pattern),
    )
}

/// A fake `go` that records being called by creating `marker`.
#[cfg(unix)]
pub fn marker_go(dir: &Path, marker: &Path) -> PathBuf {
    write_script(
        dir,
        "go",
        &format!("touch '{}'\nexit 1", marker.display()),
    )
}
