//! Cache result data types.

use serde::Serialize;

/// A stored entry matched by a lookup.
///
/// Returned by `SemanticCache::lookup()` for hits and by
/// `SemanticCache::nearest()` for every neighbour it lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheHit {
    /// Identifier of the matched entry.
    pub id: String,
    /// The previously answered query.
    pub query: String,
    /// The stored answer for `query`.
    pub answer: String,
    /// Squared-L2 distance between the probe and `query` (0.0 to 4.0, lower is closer).
    pub distance: f64,
}

