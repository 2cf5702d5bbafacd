//! Error types for semcache.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for semcache operations.
///
/// A cache miss is never an error: lookups return `Ok(None)` when nothing
/// is close enough, so every variant here is fatal to the operation.
#[derive(Error, Debug)]
pub enum Error {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ONNX inference error.
    #[error("Inference error: {0}")]
    Inference(String),

    /// Tokenization error.
    #[error("Tokenization error: {0}")]
    Tokenization(#[from] tokenizers::Error),

    /// ONNX session error.
    #[error("ONNX session error: {0}")]
    Onnx(#[from] ort::Error),

    /// HuggingFace Hub error.
    #[error("HuggingFace Hub error: {0}")]
    HfHub(#[from] hf_hub::api::sync::ApiError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input text is empty or whitespace-only.
    #[error("Input cannot be empty")]
    EmptyInput,

    /// Input text exceeds the maximum length.
    #[error("Input too long: {actual_length} bytes (max {max_length})")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding vector is empty, zero-norm, or contains non-finite values.
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// Embedding length does not match the store's dimensionality.
    #[error("Mismatched dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Store was built with a different embedding model.
    #[error("Store was built with embedding model '{stored}', but '{configured}' is configured")]
    ModelMismatch { stored: String, configured: String },

    /// Persisted store could not be decoded or violates its invariants.
    #[error("Corrupt store at {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    /// Persisted store uses a format version this build cannot read.
    #[error("Unsupported store version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The answer pipeline behind a cache miss failed.
    #[error("Answer pipeline error: {0}")]
    Pipeline(String),
}
