//! `tidemark.toml` loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tidemark_check_api::CheckSettings;

use crate::{Error, Result};

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "tidemark.toml";

/// Base revision used when neither the CLI nor the config names one.
pub const DEFAULT_BASE: &str = "main";

/// Run configuration.
///
/// ```toml
/// base = "origin/main"
/// disabled = ["structure-file-ending"]
///
/// [checks]
/// large_diff_threshold = 300
///
/// [checks.layout]
/// structure_path = "db/structure.sql"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Revision the reviewed branch is compared against.
    pub base: Option<String>,
    /// Identifiers of checks that are not evaluated.
    pub disabled: Vec<String>,
    /// Settings handed to every check.
    pub checks: CheckSettings,
}

impl Config {
    /// Parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and [`Error::Config`]
    /// when it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `tidemark.toml` from `root`, or defaults when there is none.
    ///
    /// # Errors
    ///
    /// Propagates [`Config::load`] failures for an existing file.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The configured base revision, or [`DEFAULT_BASE`].
    #[must_use]
    pub fn base(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_BASE)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tidemark_check_api::DEFAULT_LARGE_DIFF_THRESHOLD;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let config = Config::discover(temp.path())?;
        assert_eq!(config, Config::default());
        assert_eq!(config.base(), DEFAULT_BASE);
        assert_eq!(
            config.checks.large_diff_threshold(),
            Some(DEFAULT_LARGE_DIFF_THRESHOLD)
        );
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "base = \"develop\"\n\n[checks]\nlarge_diff_threshold = 0\n\n[checks.layout]\nstructure_path = \"db/primary_structure.sql\"\n",
        )
        .expect("write config");

        let config = Config::discover(temp.path())?;
        assert_eq!(config.base(), "develop");
        assert_eq!(config.checks.large_diff_threshold(), None);
        assert_eq!(config.checks.layout.structure_path, "db/primary_structure.sql");
        assert_eq!(config.checks.layout.schema_path, "db/schema.rb");
        Ok(())
    }

    #[test]
    fn invalid_file_is_reported() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "disabled = \"not-a-list\"\n").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }
}
