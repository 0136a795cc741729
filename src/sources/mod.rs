//! Static model sources.
//!
//! Besides reflection, a [`Package`] can be built without running any Go
//! code: either by parsing one source file (source mode), or by statically
//! loading a package's files (the experimental loader in package mode).

use std::path::Path;

use anyhow::Result;

use crate::model::Package;

pub mod loader;
pub mod parser;
pub mod typeexpr;

pub use loader::GoListLoader;
pub use parser::GoSourceParser;

/// Builds a model from a single source file.
pub trait SourceParser {
    /// Parse every interface declared in `path`.
    fn parse_file(&self, path: &Path) -> Result<Package>;
}

/// Builds a model for named interfaces of an importable package.
pub trait PackageLoader {
    /// Load `symbols` from `import_path`, in the order given.
    fn load(&self, import_path: &str, symbols: &[String]) -> Result<Package>;
}
