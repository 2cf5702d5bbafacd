//! Embedding capability and the default synchronous ONNX engine.
//!
//! The cache only needs a text-to-vector function; [`Embedder`] is that seam.
//! [`EmbeddingEngine`] is the local implementation, using the
//! bge-small-en-v1.5 model (384 dimensions) with mean pooling and
//! L2 normalization.

use std::path::Path;

use hf_hub::api::sync::ApiBuilder;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tokenizers::TruncationParams;

use crate::errors::Error;

/// Embedding dimensions for bge-small-en-v1.5 model.
pub const EMBEDDING_DIMS: usize = 384;

/// A text-to-vector capability.
///
/// Every entry in one store must come from the same model, so implementors
/// report a stable `model_id` that the store records and checks.
pub trait Embedder {
    /// Identifier of the model producing the vectors.
    fn model_id(&self) -> &str;

    /// Embed a single text into a fixed-length vector.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error>;
}

/// ONNX embedding engine for synchronous text-to-vector conversion.
pub struct EmbeddingEngine {
    model_id: String,
    session: Session,
    tokenizer: Tokenizer,
    requires_token_type_ids: bool,
}

impl EmbeddingEngine {
    /// Load model from `model_cache`, downloading it on first use.
    ///
    /// Uses `hf_hub::api::sync` with the ureq backend, so loading is fully
    /// blocking like the rest of the crate.
    pub fn new(model_id: &str, model_cache: &Path) -> Result<Self, Error> {
        let api = ApiBuilder::new()
            .with_cache_dir(model_cache.to_path_buf())
            .with_progress(false)
            .build()?;
        let repo = api.model(model_id.to_string());

        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))?;
        let tokenizer_path = repo.get("tokenizer.json")?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: 512,
                ..Default::default()
            }))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(ort::Error::from)?
            .commit_from_file(&model_path)?;

        let requires_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        tracing::debug!(model = model_id, "loaded embedding model");

        Ok(EmbeddingEngine {
            model_id: model_id.to_string(),
            session,
            tokenizer,
            requires_token_type_ids,
        })
    }

    fn run(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        let encoding = self.tokenizer.encode(text, true)?;
        let input_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        if input_ids.is_empty() {
            return Err(Error::Inference("Tokenizer produced no tokens".to_string()));
        }

        let seq_len = input_ids.len();

        let input_ids_vec: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
        let attention_mask_vec: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();

        let input_ids_tensor = Tensor::from_array(([1usize, seq_len], input_ids_vec))?;
        let attention_mask_tensor = Tensor::from_array(([1usize, seq_len], attention_mask_vec))?;

        let outputs = if self.requires_token_type_ids {
            let token_type_ids_tensor =
                Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))?;
            self.session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])?
        } else {
            self.session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])?
        };

        let (shape, data) = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("token_embeddings"))
            .ok_or_else(|| {
                Error::Inference(
                    "Output tensor 'last_hidden_state' or 'token_embeddings' not found".to_string(),
                )
            })?
            .try_extract_tensor::<f32>()?;

        if shape.len() != 3 {
            return Err(Error::Inference(format!(
                "Expected 3D output (batch, seq_len, hidden), got {:?}",
                shape
            )));
        }

        let batch_size = shape[0] as usize;
        let hidden_dim = shape[2] as usize;
        if batch_size != 1 || hidden_dim != EMBEDDING_DIMS {
            return Err(Error::Inference(format!(
                "Unexpected output shape: {:?}, batch=1, hidden={} expected",
                shape, EMBEDDING_DIMS
            )));
        }

        Ok(mean_pool(data, attention_mask, hidden_dim, seq_len))
    }
}

impl Embedder for EmbeddingEngine {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Returns a 384-dimensional, L2-normalized vector.
    ///
    /// Texts exceeding 512 tokens are truncated by the tokenizer.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let pooled = self.run(text)?;
        Ok(l2_normalize(&pooled))
    }
}

/// Average token vectors, weighting each by its attention mask value.
fn mean_pool(data: &[f32], attention_mask: &[u32], hidden_dim: usize, seq_len: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden_dim];

    for (token_idx, chunk) in data.chunks(hidden_dim).take(seq_len).enumerate() {
        let mask_value = attention_mask.get(token_idx).copied().unwrap_or(0) as f32;
        for (pooled_value, value) in pooled.iter_mut().zip(chunk) {
            *pooled_value += value * mask_value;
        }
    }

    let mask_sum: f32 = attention_mask
        .iter()
        .take(seq_len)
        .map(|&m| m as f32)
        .sum::<f32>()
        .max(1e-9);

    for value in pooled.iter_mut() {
        *value /= mask_sum;
    }
    pooled
}

/// Scale a vector to unit length. Zero vectors stay zero.
pub fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
