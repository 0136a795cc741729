//! The host Go toolchain.
//!
//! Toolchain detection priority:
//! 1. Explicit path (`[reflect] go = ...` in config)
//! 2. The `MOCKFORGE_GO` environment variable
//! 3. `go` on PATH

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::process::{find_executable, ProcessBuilder};

/// Environment variable naming the `go` executable.
pub const GO_ENV: &str = "MOCKFORGE_GO";

/// A located `go` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToolchain {
    program: PathBuf,
}

impl GoToolchain {
    /// Use the given program as the `go` command.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        GoToolchain {
            program: program.into(),
        }
    }

    /// Locate the toolchain, preferring an explicit path.
    pub fn detect(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(GoToolchain::new(path));
        }

        if let Ok(go) = std::env::var(GO_ENV) {
            if let Some(path) = find_executable(&go) {
                return Ok(GoToolchain::new(path));
            }
            tracing::warn!("{}={} does not name an executable", GO_ENV, go);
        }

        if let Some(path) = find_executable("go") {
            return Ok(GoToolchain::new(path));
        }

        bail!(
            "no Go toolchain found\n\
             \n\
             mockforge needs `go` to build the reflection program.\n\
             Install Go, set {}, or configure `[reflect] go` in .mockforge/config.toml.",
            GO_ENV
        )
    }

    /// Path of the `go` executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `go build -o <output> <source>`, run from `dir`.
    pub fn build(&self, dir: &Path, output: &str, source: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(["build", "-o", output, source])
            .cwd(dir)
    }

    /// `go list -f {{.Dir}} <import_path>`.
    pub fn list_dir(&self, import_path: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).args(["list", "-f", "{{.Dir}}", import_path])
    }
}

/// File name of the compiled introspection program on this platform.
///
/// Windows won't execute a program without an `.exe` suffix.
pub fn program_binary_name() -> String {
    format!("prog.bin{}", std::env::consts::EXE_SUFFIX)
}
