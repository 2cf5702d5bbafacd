//! Core cache struct combining embedding generation and the on-disk store.

use std::path::{Component, Path, PathBuf};

use crate::config::{validate_distance_threshold, Config};
use crate::embedding::{l2_normalize, Embedder, EmbeddingEngine};
use crate::errors::Error;
use crate::index::distance::validate_embedding;
use crate::index::{snapshot, VectorIndex};

/// Maximum allowed input length (100,000 bytes).
pub const MAX_INPUT_LENGTH: usize = 100_000;
/// Maximum allowed limit for listing and neighbour operations.
pub const MAX_SEARCH_LIMIT: usize = 10_000;

/// Semantic response cache over a persistent vector index.
///
/// Holds no entries in memory between calls: every operation reloads the
/// store from `store_path`, so saves made by other cache instances are seen
/// by the next call.
///
/// # Mutability Requirements
///
/// Methods that generate embeddings (`search`, `lookup`, `nearest`, `save`)
/// require `&mut self` because `Embedder::embed` may mutate engine state.
pub struct SemanticCache<E: Embedder = EmbeddingEngine> {
    pub(crate) store_path: PathBuf,
    pub(crate) embedder: E,
    pub(crate) distance_threshold: f64,
}

impl SemanticCache<EmbeddingEngine> {
    /// Open a cache using the ONNX embedding engine named in `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, the model cache
    /// directory cannot be created, or the embedding model cannot be loaded.
    pub fn open(config: &Config) -> Result<Self, Error> {
        config.validate()?;
        config.ensure_directories()?;
        let engine = EmbeddingEngine::new(&config.embedding_model, &config.model_cache)?;
        Self::with_embedder(&config.store_path, engine, config.distance_threshold)
    }
}

impl<E: Embedder> SemanticCache<E> {
    /// Create a cache over `store_path` with a custom embedder.
    ///
    /// The store directory does not need to exist; the first save creates it.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Store path is empty or contains `..` components
    /// - Distance threshold is NaN, infinite, or outside `[0.0, 4.0]`
    pub fn with_embedder(
        store_path: &Path,
        embedder: E,
        distance_threshold: f64,
    ) -> Result<Self, Error> {
        if store_path.as_os_str().is_empty() {
            return Err(Error::Config("Store path cannot be empty".to_string()));
        }
        if store_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(Error::Config(
                "Invalid store path: contains '..' which may escape the intended directory"
                    .to_string(),
            ));
        }
        validate_distance_threshold(distance_threshold)?;

        Ok(SemanticCache {
            store_path: store_path.to_path_buf(),
            embedder,
            distance_threshold,
        })
    }

    /// Directory holding the persisted store.
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Maximum squared-L2 distance accepted as a hit.
    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    /// Identifier of the embedding model used for this cache.
    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    /// Load the persisted store, checking it was built by our embedder.
    pub(crate) fn load_index(&self) -> Result<Option<VectorIndex>, Error> {
        let Some(index) = snapshot::load(&self.store_path)? else {
            return Ok(None);
        };

        if index.model() != self.embedder.model_id() {
            return Err(Error::ModelMismatch {
                stored: index.model().to_string(),
                configured: self.embedder.model_id().to_string(),
            });
        }
        Ok(Some(index))
    }

    /// Embed `text` and scale the result to unit length.
    pub(crate) fn embed_normalized(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        let raw = self.embedder.embed(text)?;
        validate_embedding(&raw)?;
        Ok(l2_normalize(&raw))
    }

    /// Validate input length (rejects empty and whitespace-only inputs).
    pub(crate) fn validate_input_length(text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if text.len() > MAX_INPUT_LENGTH {
            return Err(Error::InputTooLong {
                max_length: MAX_INPUT_LENGTH,
                actual_length: text.len(),
            });
        }
        Ok(())
    }
}

/// Validate a listing or neighbour limit.
pub(crate) fn validate_limit(limit: usize) -> Result<(), Error> {
    if limit == 0 {
        return Err(Error::InvalidInput(
            "Limit must be greater than 0".to_string(),
        ));
    }
    if limit > MAX_SEARCH_LIMIT {
        return Err(Error::InvalidInput(format!(
            "Limit {} exceeds maximum allowed ({})",
            limit, MAX_SEARCH_LIMIT
        )));
    }
    Ok(())
}
