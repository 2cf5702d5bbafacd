//! Semantic response cache.
//!
//! Decides whether an incoming query is close enough to a previously
//! answered one to reuse its answer, and persists new (query, answer) pairs.

mod lookup;
mod save;

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use store::SemanticCache;
