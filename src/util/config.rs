//! Configuration file support for mockforge.
//!
//! mockforge supports two configuration file locations:
//! - Global: `<config dir>/mockforge/config.toml` - User-wide defaults
//! - Project: `.mockforge/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// mockforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Matcher generation settings
    pub matchers: MatchersConfig,

    /// Reflection settings
    pub reflect: ReflectConfig,

    /// Static loader settings
    pub loader: LoaderConfig,
}

/// Where and how mocks are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output directory for mock files
    pub dir: Option<PathBuf>,

    /// Package name for generated mocks
    pub package: Option<String>,

    /// Import path of the package the mocks will live in
    pub self_package: Option<String>,
}

/// Matcher generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchersConfig {
    /// Always generate matchers
    #[serde(default)]
    pub generate: bool,

    /// Matchers directory (defaults to `matchers` beside the mock file)
    pub destination: Option<PathBuf>,

    /// Comma-separated matcher type names to skip
    pub skip: Option<String>,
}

/// Reflection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectConfig {
    /// Path to the `go` executable
    pub go: Option<PathBuf>,

    /// Go import path of the helper package used by the introspection program
    pub helper_import: Option<String>,

    /// Directory under which the temporary build workspace is created
    pub workspace_root: Option<PathBuf>,
}

/// Static loader settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Use the static loader instead of reflection in package mode
    #[serde(default)]
    pub experimental: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Output settings
        if other.output.dir.is_some() {
            self.output.dir = other.output.dir;
        }
        if other.output.package.is_some() {
            self.output.package = other.output.package;
        }
        if other.output.self_package.is_some() {
            self.output.self_package = other.output.self_package;
        }

        // Matcher settings
        if other.matchers.generate {
            self.matchers.generate = true;
        }
        if other.matchers.destination.is_some() {
            self.matchers.destination = other.matchers.destination;
        }
        if other.matchers.skip.is_some() {
            self.matchers.skip = other.matchers.skip;
        }

        // Reflect settings
        if other.reflect.go.is_some() {
            self.reflect.go = other.reflect.go;
        }
        if other.reflect.helper_import.is_some() {
            self.reflect.helper_import = other.reflect.helper_import;
        }
        if other.reflect.workspace_root.is_some() {
            self.reflect.workspace_root = other.reflect.workspace_root;
        }

        if other.loader.experimental {
            self.loader.experimental = true;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.mockforge/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Matcher type names excluded from generation.
///
/// Parsed once from a comma-separated list; entries are trimmed and blanks
/// are dropped, so `"Foo, Bar,"` excludes exactly `Foo` and `Bar`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherExclusions(BTreeSet<String>);

impl MatcherExclusions {
    /// Parse a comma-separated skip-list.
    pub fn parse(list: &str) -> Self {
        MatcherExclusions(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether the named matcher type is excluded.
    pub fn contains(&self, matcher: &str) -> bool {
        self.0.contains(matcher)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for MatcherExclusions {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MatcherExclusions::parse(s))
    }
}
