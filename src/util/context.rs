//! Global context for mockforge operations.
//!
//! Provides centralized access to the working directory and the
//! configuration file locations.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::config::{load_config, Config};

/// Project directories for mockforge
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "mockforge", "mockforge"));

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the global config file, if one can be determined
    config_dir: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let config_dir = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf());

        GlobalContext { cwd, config_dir }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Path to the global config file.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join("config.toml"))
    }

    /// Path to the project config file (.mockforge/config.toml).
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(".mockforge").join("config.toml")
    }

    /// Load merged global and project configuration.
    pub fn load_config(&self) -> Config {
        load_config(
            self.global_config_path().as_deref(),
            &self.project_config_path(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_config_path() {
        let ctx = GlobalContext::with_cwd(PathBuf::from("/work/proj"));
        assert_eq!(
            ctx.project_config_path(),
            PathBuf::from("/work/proj/.mockforge/config.toml")
        );
    }

    #[test]
    fn test_load_project_config() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".mockforge")).unwrap();
        std::fs::write(
            tmp.path().join(".mockforge/config.toml"),
            "[matchers]\nskip = \"Foo\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        let config = ctx.load_config();
        assert_eq!(config.matchers.skip, Some("Foo".to_string()));
    }
}
