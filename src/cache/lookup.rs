//! Read-side operations: threshold lookup and nearest-neighbour listing.

use crate::cache_types::CacheHit;
use crate::embedding::Embedder;
use crate::errors::Error;
use crate::index::Neighbor;

use super::store::{validate_limit, SemanticCache};

impl From<Neighbor<'_>> for CacheHit {
    fn from(n: Neighbor<'_>) -> Self {
        CacheHit {
            id: n.entry.id.clone(),
            query: n.entry.query.clone(),
            answer: n.entry.answer.clone(),
            distance: n.distance,
        }
    }
}

impl<E: Embedder> SemanticCache<E> {
    #[must_use = "handle the error or the cached answer is lost"]
    /// Return the stored answer for the closest past query, if close enough.
    ///
    /// `Ok(None)` is a miss: either no store exists yet or the nearest entry
    /// lies farther than the distance threshold. Errors are never misses.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query is empty or exceeds 100,000 bytes
    /// - The store cannot be read, is corrupt, or belongs to another model
    /// - Embedding generation fails
    pub fn search(&mut self, query: &str) -> Result<Option<String>, Error> {
        Ok(self.lookup(query)?.map(|hit| hit.answer))
    }

    #[must_use = "handle the error or the cached answer is lost"]
    /// Like [`search`](Self::search), but returns the matched entry and its distance.
    pub fn lookup(&mut self, query: &str) -> Result<Option<CacheHit>, Error> {
        let query = query.trim();
        Self::validate_input_length(query)?;

        let Some(index) = self.load_index()? else {
            tracing::debug!(store = %self.store_path.display(), "cache miss: no store");
            return Ok(None);
        };

        let probe = self.embed_normalized(query)?;
        let Some(nearest) = index.nearest(&probe)? else {
            tracing::debug!("cache miss: store is empty");
            return Ok(None);
        };

        if nearest.distance <= self.distance_threshold {
            tracing::debug!(
                id = %nearest.entry.id,
                distance = nearest.distance,
                "cache hit"
            );
            Ok(Some(nearest.into()))
        } else {
            tracing::debug!(
                distance = nearest.distance,
                threshold = self.distance_threshold,
                "cache miss: nearest entry beyond threshold"
            );
            Ok(None)
        }
    }

    #[must_use = "handle the error or results may be lost"]
    /// List the `limit` stored entries closest to `query`, nearest first.
    ///
    /// Ignores the distance threshold. Returns an empty list when no store
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns error if the limit is 0 or above `MAX_SEARCH_LIMIT`, the query
    /// is invalid, or the store or embedder fails.
    pub fn nearest(&mut self, query: &str, limit: usize) -> Result<Vec<CacheHit>, Error> {
        validate_limit(limit)?;
        let query = query.trim();
        Self::validate_input_length(query)?;

        let Some(index) = self.load_index()? else {
            return Ok(Vec::new());
        };
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let probe = self.embed_normalized(query)?;
        Ok(index
            .nearest_k(&probe, limit)?
            .into_iter()
            .map(CacheHit::from)
            .collect())
    }
}
