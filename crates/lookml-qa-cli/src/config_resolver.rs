//! Locating and loading `lookml-qa.toml`.
//!
//! Lookup order, first hit wins:
//!
//! 1. the `--config` flag, taken as given
//! 2. `lookml-qa.toml`, then `.lookml-qa.toml`, in the project directory
//! 3. `config.toml` in the global directory (`$LOOKML_QA_CONFIG_DIR`, else
//!    `~/.lookml-qa/`)
//!
//! With no hit the built-in defaults apply.

use anyhow::{Context, Result};
use lookml_qa_core::Config;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_FILES: &[&str] = &["lookml-qa.toml", ".lookml-qa.toml"];

/// Config file name inside the global directory.
const GLOBAL_FILE: &str = "config.toml";

/// Environment variable overriding the global directory.
const GLOBAL_DIR_ENV: &str = "LOOKML_QA_CONFIG_DIR";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the global fallback.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// Reads the configuration, or returns defaults for
    /// [`ConfigSource::Default`].
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        if self.is_global() {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the configuration for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(project_dir, explicit, global_config_dir())
}

/// Resolution with the global directory passed in, so tests need not touch
/// the environment.
fn resolve_with(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_FILE)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns the global config directory.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(GLOBAL_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".lookml-qa")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn explicit_flag_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(project.path(), "lookml-qa.toml");
        let missing = Path::new("/does/not/exist.toml");

        assert_eq!(
            resolve_with(project.path(), Some(missing), None),
            ConfigSource::Explicit(missing.to_path_buf())
        );
    }

    #[test]
    fn project_files_are_tried_in_order() {
        let project = TempDir::new().unwrap();
        let hidden = touch(project.path(), ".lookml-qa.toml");
        assert_eq!(
            resolve_with(project.path(), None, None),
            ConfigSource::Project(hidden)
        );

        let visible = touch(project.path(), "lookml-qa.toml");
        assert_eq!(
            resolve_with(project.path(), None, None),
            ConfigSource::Project(visible)
        );
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_file = touch(global.path(), "config.toml");

        let source = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Global(global_file));
        assert!(source.is_global());

        touch(project.path(), "lookml-qa.toml");
        let source = resolve_with(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(source, ConfigSource::Project(_)));
    }

    #[test]
    fn defaults_when_nothing_is_found() {
        let project = TempDir::new().unwrap();
        let empty_global = TempDir::new().unwrap();
        let source = resolve_with(project.path(), None, Some(empty_global.path().to_path_buf()));
        assert_eq!(source, ConfigSource::Default);
        assert!(source.path().is_none());
        assert_eq!(source.load().unwrap().fail_threshold(), Status::Fail);
    }

    #[test]
    fn load_reads_the_resolved_file() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("lookml-qa.toml"),
            "fail_on = \"warning\"\n[checks.derived-tables]\nenabled = false\n",
        )
        .unwrap();

        let config = resolve_with(project.path(), None, None).load().unwrap();
        assert_eq!(config.fail_threshold(), Status::Warning);
        assert!(!config.is_check_enabled("derived-tables"));
    }

    #[test]
    fn load_reports_the_broken_file() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("lookml-qa.toml"), "preset = [").unwrap();

        let err = resolve_with(project.path(), None, None).load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config:"));
    }
}
