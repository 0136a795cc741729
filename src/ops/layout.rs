//! Mode selection and output layout.
//!
//! Everything here is pure: no files are touched, so argument mistakes are
//! reported before any I/O happens.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::config::MatcherExclusions;

/// Extension of every generated file.
pub const GO_EXT: &str = "go";

/// Directory name for matchers when no destination is configured.
pub const MATCHERS_DIR: &str = "matchers";

/// Wrong positional arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("expected exactly two arguments (import path and interfaces), but got {0:?}")]
    ArgumentCount(Vec<String>),

    #[error("no interface names given for package `{0}`")]
    NoSymbols(String),
}

/// Where the model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Parse one `.go` file
    Source(PathBuf),

    /// Load named interfaces from an importable package
    Package {
        import_path: String,
        symbols: Vec<String>,

        /// The interface list as given on the command line
        list: String,
    },
}

impl Mode {
    /// Select the mode for `args`.
    ///
    /// A single argument ending in `.go` is a source file; anything else must
    /// be an import path followed by a comma-separated list of interfaces.
    pub fn from_args(args: &[String]) -> Result<Mode, UsageError> {
        if let [file] = args {
            if file.ends_with(".go") {
                return Ok(Mode::Source(PathBuf::from(file)));
            }
        }

        let [import_path, list] = args else {
            return Err(UsageError::ArgumentCount(args.to_vec()));
        };

        let symbols: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if symbols.is_empty() {
            return Err(UsageError::NoSymbols(import_path.clone()));
        }

        Ok(Mode::Package {
            import_path: import_path.clone(),
            symbols,
            list: list.clone(),
        })
    }

    /// Human-readable origin embedded in generated headers.
    pub fn provenance(&self) -> String {
        match self {
            Mode::Source(path) => path.display().to_string(),
            Mode::Package {
                import_path, list, ..
            } => format!("{} (interfaces: {})", import_path, list),
        }
    }

    /// Stem used in the default mock file name.
    fn stem(&self) -> String {
        match self {
            Mode::Source(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Mode::Package { import_path, .. } => import_path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(import_path)
                .to_lowercase(),
        }
    }
}

/// Path of the mock file.
///
/// A non-empty `output` wins verbatim; otherwise the name is derived from the
/// mode and placed in `output_dir`.
pub fn output_file_path(mode: &Mode, output_dir: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => output_dir.join(format!("mock_{}_test.{}", mode.stem(), GO_EXT)),
    }
}

/// Resolved locations for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub mock_path: PathBuf,

    /// Matchers directory; `None` when matchers are not generated
    pub matchers_dir: Option<PathBuf>,
}

impl OutputLayout {
    pub fn resolve(
        mode: &Mode,
        output_dir: &Path,
        output: Option<&Path>,
        matchers: bool,
        matchers_dir: Option<&Path>,
    ) -> Self {
        let mock_path = output_file_path(mode, output_dir, output);
        let matchers_dir = matchers.then(|| match matchers_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => mock_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(MATCHERS_DIR),
        });
        OutputLayout {
            mock_path,
            matchers_dir,
        }
    }

    /// Files to write for `names`, leaving out excluded matchers.
    pub fn matcher_paths<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        skip: &MatcherExclusions,
    ) -> Vec<(&'a str, PathBuf)> {
        let Some(ref dir) = self.matchers_dir else {
            return Vec::new();
        };
        names
            .into_iter()
            .filter(|name| !skip.contains(name))
            .map(|name| (name, dir.join(format!("{}.{}", name, GO_EXT))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_mode() {
        let mode = Mode::from_args(&args(&["foo.go"])).unwrap();
        assert_eq!(mode, Mode::Source(PathBuf::from("foo.go")));
    }

    #[test]
    fn test_package_mode_trims_symbols() {
        let mode = Mode::from_args(&args(&["example.com/pkg", " Reader , Writer,"])).unwrap();
        assert_eq!(
            mode,
            Mode::Package {
                import_path: "example.com/pkg".into(),
                symbols: vec!["Reader".into(), "Writer".into()],
                list: " Reader , Writer,".into(),
            }
        );
    }

    #[test]
    fn test_provenance_keeps_interface_list_verbatim() {
        let mode = Mode::from_args(&args(&["example.com/pkg", "Reader,Writer"])).unwrap();
        assert_eq!(mode.provenance(), "example.com/pkg (interfaces: Reader,Writer)");

        let source = Mode::from_args(&args(&["src/foo.go"])).unwrap();
        assert_eq!(source.provenance(), "src/foo.go");
    }

    #[test]
    fn test_package_mode_argument_count() {
        for bad in [
            args(&[]),
            args(&["example.com/pkg"]),
            args(&["example.com/pkg", "Reader", "extra"]),
        ] {
            assert_eq!(
                Mode::from_args(&bad),
                Err(UsageError::ArgumentCount(bad.clone()))
            );
        }
        assert!(matches!(
            Mode::from_args(&args(&["example.com/pkg", " , "])),
            Err(UsageError::NoSymbols(_))
        ));
    }

    #[test]
    fn test_output_file_path() {
        let dir = Path::new("out");
        let source = Mode::from_args(&args(&["src/foo.go"])).unwrap();
        assert_eq!(
            output_file_path(&source, dir, None),
            Path::new("out/mock_foo_test.go")
        );

        let package = Mode::from_args(&args(&["example.com/Pkg", "Reader,Writer"])).unwrap();
        assert_eq!(
            output_file_path(&package, dir, None),
            Path::new("out/mock_pkg_test.go")
        );

        let explicit = Path::new("elsewhere/custom.go");
        assert_eq!(output_file_path(&package, dir, Some(explicit)), explicit);
        assert_eq!(
            output_file_path(&package, dir, Some(Path::new(""))),
            Path::new("out/mock_pkg_test.go")
        );
    }

    #[test]
    fn test_matchers_dir_defaults_beside_mock() {
        let mode = Mode::from_args(&args(&["foo.go"])).unwrap();
        let layout = OutputLayout::resolve(&mode, Path::new("out"), None, true, None);
        assert_eq!(layout.matchers_dir.as_deref(), Some(Path::new("out/matchers")));

        let layout = OutputLayout::resolve(
            &mode,
            Path::new("out"),
            None,
            true,
            Some(Path::new("m")),
        );
        assert_eq!(layout.matchers_dir.as_deref(), Some(Path::new("m")));

        let layout = OutputLayout::resolve(&mode, Path::new("out"), None, false, None);
        assert!(layout.matchers_dir.is_none());
    }

    #[test]
    fn test_matcher_paths_honour_skip_list() {
        let mode = Mode::from_args(&args(&["foo.go"])).unwrap();
        let layout = OutputLayout::resolve(&mode, Path::new("out"), None, true, None);

        let skip: MatcherExclusions = "Foo, Bar".parse().unwrap();
        let paths = layout.matcher_paths(["Foo", "Bar", "Baz"], &skip);
        assert_eq!(
            paths,
            vec![("Baz", PathBuf::from("out/matchers/Baz.go"))]
        );

        let none: MatcherExclusions = "  ".parse().unwrap();
        assert_eq!(layout.matcher_paths(["Foo", "Bar"], &none).len(), 2);
    }
}
