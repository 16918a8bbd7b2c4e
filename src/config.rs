use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the config file the CLI picks up from the working directory
pub const CONFIG_FILE_NAME: &str = "stackcheck.toml";

/// A stackcheck config file. Namely stackcheck.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub checker: CheckerConfig,
}

/// Options that change what the checker accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Start every function body with its declared parameter types on the
    /// symbolic stack. When false, bodies start from an empty stack and
    /// parameters are purely declarative.
    pub seed_parameters: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            seed_parameters: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = Config::from_toml("", Path::new("empty.toml")).unwrap();
        assert!(config.checker.seed_parameters);

        let config = Config::from_toml("[checker]\n", Path::new("partial.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[checker]\nseed_parameters = false").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.checker.seed_parameters);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[checker]\nseed_parameters = 3", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().starts_with("invalid config bad.toml"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
    }
}
