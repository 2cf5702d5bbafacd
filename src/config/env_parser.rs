//! Environment variable parsing utilities for configuration.

use crate::errors::Error;
use std::path::PathBuf;

use super::paths;

pub const STORE_PATH_VAR: &str = "SEMCACHE_STORE_PATH";
pub const EMBEDDING_MODEL_VAR: &str = "SEMCACHE_EMBEDDING_MODEL";
pub const MODEL_CACHE_VAR: &str = "SEMCACHE_MODEL_CACHE";
pub const DISTANCE_THRESHOLD_VAR: &str = "SEMCACHE_DISTANCE_THRESHOLD";

/// Parse environment variable value or return error if empty/whitespace.
fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Parse environment variable as a path, expanding tilde.
fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as a f64. Range is checked by validation.
fn parse_env_float(name: &str, value: &str) -> Result<f64, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Apply SEMCACHE_STORE_PATH environment variable override.
pub fn apply_store_path_override(store_path: &mut PathBuf) -> Result<(), Error> {
    if let Ok(val) = std::env::var(STORE_PATH_VAR) {
        *store_path = parse_env_path(STORE_PATH_VAR, &val)?;
    }
    Ok(())
}

/// Apply SEMCACHE_EMBEDDING_MODEL environment variable override.
pub fn apply_embedding_model_override(embedding_model: &mut String) -> Result<(), Error> {
    if let Ok(val) = std::env::var(EMBEDDING_MODEL_VAR) {
        *embedding_model = parse_env_string(EMBEDDING_MODEL_VAR, &val)?;
    }
    Ok(())
}

/// Apply SEMCACHE_MODEL_CACHE environment variable override.
pub fn apply_model_cache_override(model_cache: &mut PathBuf) -> Result<(), Error> {
    if let Ok(val) = std::env::var(MODEL_CACHE_VAR) {
        *model_cache = parse_env_path(MODEL_CACHE_VAR, &val)?;
    }
    Ok(())
}

/// Apply SEMCACHE_DISTANCE_THRESHOLD environment variable override.
pub fn apply_distance_threshold_override(distance_threshold: &mut f64) -> Result<(), Error> {
    if let Ok(val) = std::env::var(DISTANCE_THRESHOLD_VAR) {
        *distance_threshold = parse_env_float(DISTANCE_THRESHOLD_VAR, &val)?;
    }
    Ok(())
}
