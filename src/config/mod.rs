//! Configuration system for semcache.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
pub(crate) mod tests_utils;

use crate::errors::Error;
use std::path::{Path, PathBuf};

pub use loader::{default_config_path, ConfigFile};
pub use validation::validate_distance_threshold;

/// Default maximum squared-L2 distance for a cache hit.
///
/// On unit vectors this is a cosine similarity of at least 0.975.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.05;

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the cache store (`index.json`).
    pub store_path: PathBuf,

    /// HuggingFace embedding model identifier.
    pub embedding_model: String,

    /// Directory for caching ONNX models.
    pub model_cache: PathBuf,

    /// Maximum squared-L2 distance (over unit vectors) for a cache hit.
    pub distance_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });

        Self {
            store_path: PathBuf::from("./vectorstore/cache"),
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
            model_cache: home.join(".semcache").join("models"),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&default_config_path())
    }

    /// Load configuration with defaults, file values, and environment overrides.
    pub fn load_from(config_path: &Path) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(file) = loader::load_from_file(config_path)? {
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(
            &mut config.store_path,
            &mut config.embedding_model,
            &mut config.model_cache,
            &mut config.distance_threshold,
        )?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if let Some(mut store_path) = file.store_path {
            paths::expand_tilde(&mut store_path);
            self.store_path = store_path;
        }
        if let Some(embedding_model) = file.embedding_model {
            self.embedding_model = embedding_model;
        }
        if let Some(mut model_cache) = file.model_cache {
            paths::expand_tilde(&mut model_cache);
            self.model_cache = model_cache;
        }
        if let Some(distance_threshold) = file.distance_threshold {
            self.distance_threshold = distance_threshold;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            store_path: self.store_path.clone(),
            embedding_model: self.embedding_model.clone(),
            distance_threshold: self.distance_threshold,
        };

        validator.validate()
    }

    /// Ensure the model cache directory exists.
    ///
    /// The store directory is created lazily by the first save.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if !self.model_cache.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.model_cache).map_err(|e| {
                Error::Config(format!(
                    "Failed to create model cache directory {}: {e}",
                    self.model_cache.display()
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::tests_utils::{cleanup_env_vars, set_env, ENV_MUTEX};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.store_path, PathBuf::from("./vectorstore/cache"));
        assert_eq!(config.embedding_model, "BAAI/bge-small-en-v1.5");
        assert!(config.model_cache.ends_with(".semcache/models"));
        assert_eq!(config.distance_threshold, 0.05);
    }

    #[test]
    fn test_config_load_without_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();

        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "store_path = \"/srv/cache\"\ndistance_threshold = 0.2\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.store_path, PathBuf::from("/srv/cache"));
        assert_eq!(config.distance_threshold, 0.2);
        assert_eq!(config.embedding_model, "BAAI/bge-small-en-v1.5");
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "distance_threshold = 0.2\n").unwrap();
        set_env("SEMCACHE_DISTANCE_THRESHOLD", "0.3");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.distance_threshold, 0.3);

        cleanup_env_vars();
    }

    #[test]
    fn test_out_of_range_file_threshold_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        cleanup_env_vars();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "distance_threshold = 7.5\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_ensure_directories_creates_model_cache() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            model_cache: dir.path().join("models/nested"),
            ..Config::default()
        };

        config.ensure_directories().unwrap();
        assert!(config.model_cache.is_dir());
    }
}
