//! Experimental static package loader.
//!
//! Resolves the package directory with `go list` and parses its files
//! directly, so no program is built or run. The resulting model has the
//! same shape as a reflected one: the package's own types are qualified
//! with its import path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::parser::GoSourceParser;
use super::PackageLoader;
use crate::model::{Interface, Package, Parameter};
use crate::toolchain::GoToolchain;
use crate::util::fs::go_files;

/// Loads interfaces by parsing the files `go list` points at.
#[derive(Debug, Clone, Default)]
pub struct GoListLoader {
    go: Option<PathBuf>,
    parser: GoSourceParser,
}

impl GoListLoader {
    /// Create a loader, optionally with an explicit `go` executable.
    pub fn new(go: Option<PathBuf>) -> Self {
        GoListLoader {
            go,
            parser: GoSourceParser::new(),
        }
    }

    /// Load `symbols` from the package whose files live in `dir`.
    pub fn load_dir(&self, dir: &Path, import_path: &str, symbols: &[String]) -> Result<Package> {
        let files = go_files(dir)?;
        if files.is_empty() {
            bail!("no Go files in {}", dir.display());
        }

        let mut package_name: Option<String> = None;
        let mut found: HashMap<String, Interface> = HashMap::new();
        for file in &files {
            let parsed = self.parser.parse_path(file)?;
            let name = package_name.get_or_insert_with(|| parsed.package.clone());
            if *name != parsed.package {
                debug!(
                    "skipping {} (package {} != {})",
                    file.display(),
                    parsed.package,
                    name
                );
                continue;
            }
            for interface in parsed.interfaces {
                found.insert(interface.name.clone(), interface);
            }
        }

        let mut pkg = Package::new(package_name.unwrap_or_default());
        for symbol in symbols {
            let interface = found.get(symbol).cloned().with_context(|| {
                format!("interface `{}` not found in package `{}`", symbol, import_path)
            })?;
            pkg.interfaces.push(qualify_interface(interface, import_path));
        }
        Ok(pkg)
    }
}

impl PackageLoader for GoListLoader {
    fn load(&self, import_path: &str, symbols: &[String]) -> Result<Package> {
        let toolchain = GoToolchain::detect(self.go.as_deref())?;
        let output = toolchain.list_dir(import_path).exec_and_check()?;
        let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if dir.is_empty() {
            bail!("`go list` returned no directory for `{}`", import_path);
        }
        debug!("package {} resolved to {}", import_path, dir);

        self.load_dir(Path::new(&dir), import_path, symbols)
    }
}

fn qualify_interface(mut interface: Interface, import_path: &str) -> Interface {
    let qualify = |p: Parameter| Parameter {
        name: p.name,
        ty: p.ty.qualified(import_path),
    };
    for method in &mut interface.methods {
        method.params = std::mem::take(&mut method.params)
            .into_iter()
            .map(qualify)
            .collect();
        method.results = std::mem::take(&mut method.results)
            .into_iter()
            .map(qualify)
            .collect();
        method.variadic = method.variadic.take().map(qualify);
    }
    interface
}
