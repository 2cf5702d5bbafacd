//! semcache - A semantic response cache for question answering.
//!
//! Answers are stored against the embedding of the query that produced
//! them. A later query whose embedding lies within a distance threshold of
//! a stored one is served from the cache instead of the answer pipeline.
//! All operations are synchronous (no async/await required).
//!
//! # Example
//!
//! ```no_run
//! use semcache::{Config, SemanticCache};
//!
//! let config = Config::load().expect("Failed to load config");
//! let mut cache = SemanticCache::open(&config).expect("Failed to open cache");
//!
//! cache
//!     .save("What are your opening hours?", "We are open 9am to 5pm.")
//!     .expect("Failed to save");
//!
//! match cache.search("When are you open?") {
//!     Ok(Some(answer)) => println!("Cached: {}", answer),
//!     Ok(None) => println!("Miss, ask the pipeline"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Mutability Requirements
//!
//! Methods that generate embeddings (`search`, `lookup`, `nearest`, `save`)
//! require `&mut self` because the embedding engine internally mutates state
//! for ONNX tensor allocations.

pub mod cache;
pub mod cache_types;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod import;
pub mod index;
pub mod session;

// Re-export public API
pub use cache::SemanticCache;
pub use cache::store::{MAX_INPUT_LENGTH, MAX_SEARCH_LIMIT};
pub use cache_types::CacheHit;
pub use config::Config;
pub use embedding::{Embedder, EmbeddingEngine, EMBEDDING_DIMS};
pub use errors::Error;
pub use import::{import_from_json, ImportStats};
pub use index::CacheEntry;
pub use session::{respond, AnswerPipeline, ConversationContext, Message, Reply, ReplySource, Role};
