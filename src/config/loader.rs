//! Configuration file loading and parsing.

use crate::errors::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML file.
///
/// Every field is optional; missing fields keep the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub embedding_model: Option<String>,

    #[serde(default)]
    pub model_cache: Option<PathBuf>,

    #[serde(default)]
    pub distance_threshold: Option<f64>,
}

/// Default location of the config file: `<config_dir>/semcache/config.toml`.
pub fn default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
    config_dir.join("semcache/config.toml")
}

/// Load configuration from a TOML file, if it exists.
pub fn load_from_file(config_path: &Path) -> Result<Option<ConfigFile>, Error> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(config_path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {e}",
            config_path.display()
        ))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {e}",
            config_path.display()
        ))
    })?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_malformed_toml() {
        let content = r#"
This is not valid TOML
 [[unclosed bracket
 "#;

        let result: Result<ConfigFile, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_file() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.store_path.is_none());
        assert!(config.embedding_model.is_none());
        assert!(config.model_cache.is_none());
        assert!(config.distance_threshold.is_none());
    }

    #[test]
    fn test_config_file_partial_toml() {
        let content = r#"
            store_path = "/test/cache"
            distance_threshold = 0.1
        "#;

        let config: ConfigFile = toml::from_str(content).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/test/cache")));
        assert_eq!(config.distance_threshold, Some(0.1));
        assert!(config.embedding_model.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("similarity_threshold = 0.9");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let result = load_from_file(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store_path = [").unwrap();
        assert!(matches!(load_from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_config_path_location() {
        assert!(default_config_path().ends_with("semcache/config.toml"));
    }
}
