//! Environment variable overrides for configuration.

use crate::errors::Error;
use std::path::PathBuf;

use super::env_parser;

/// Apply environment variable overrides to configuration.
pub fn apply_env_overrides(
    store_path: &mut PathBuf,
    embedding_model: &mut String,
    model_cache: &mut PathBuf,
    distance_threshold: &mut f64,
) -> Result<(), Error> {
    env_parser::apply_store_path_override(store_path)?;
    env_parser::apply_embedding_model_override(embedding_model)?;
    env_parser::apply_model_cache_override(model_cache)?;
    env_parser::apply_distance_threshold_override(distance_threshold)?;
    Ok(())
}
