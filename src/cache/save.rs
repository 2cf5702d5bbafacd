//! Write-side operations and read-only listing.

use std::collections::HashSet;

use crate::embedding::Embedder;
use crate::errors::Error;
use crate::index::{snapshot, CacheEntry, VectorIndex};

use super::store::{validate_limit, SemanticCache};

impl<E: Embedder> SemanticCache<E> {
    #[must_use = "handle the error or the entry may not be stored"]
    /// Store an answer for `query` and persist the whole store.
    ///
    /// Creates the store on first use. Returns the new entry id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query or answer is empty or exceeds 100,000 bytes
    /// - The existing store is unreadable, corrupt, or from another model
    /// - Embedding generation fails
    /// - The store cannot be written (the previous snapshot is left intact)
    pub fn save(&mut self, query: &str, answer: &str) -> Result<String, Error> {
        let mut ids = self.save_batch(&[(query.to_string(), answer.to_string())])?;
        ids.pop()
            .ok_or_else(|| Error::InvalidInput("nothing to save".to_string()))
    }

    #[must_use = "handle the error or the entries may not be stored"]
    /// Store many (query, answer) pairs with a single persist.
    ///
    /// All pairs are validated before anything is embedded; an invalid pair
    /// aborts the whole batch. An empty batch is a no-op.
    pub fn save_batch(&mut self, pairs: &[(String, String)]) -> Result<Vec<String>, Error> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        for (query, answer) in pairs {
            Self::validate_input_length(query)?;
            Self::validate_input_length(answer)?;
        }

        let mut index = self.load_index()?;
        let mut ids = Vec::with_capacity(pairs.len());

        for (query, answer) in pairs {
            // Surrounding whitespace carries no meaning; the stored text stays verbatim.
            let embedding = self.embed_normalized(query.trim())?;
            let target = index.get_or_insert_with(|| {
                VectorIndex::new(self.embedder.model_id(), embedding.len())
            });

            let entry = CacheEntry::new(query, answer, embedding);
            ids.push(entry.id.clone());
            target.push(entry)?;
        }

        if let Some(index) = &index {
            snapshot::save(&self.store_path, index)?;
        }
        tracing::debug!(saved = ids.len(), "saved cache entries");
        Ok(ids)
    }

    #[must_use = "handle the error or results may be lost"]
    /// List stored entries in insertion order, newest last, up to `limit`.
    pub fn entries(&self, limit: usize) -> Result<Vec<CacheEntry>, Error> {
        validate_limit(limit)?;
        Ok(self
            .load_index()?
            .map(|index| index.entries().iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    #[must_use = "handle the error or results may be lost"]
    /// Number of stored entries. An absent store has none.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.load_index()?.map_or(0, |index| index.len()))
    }

    #[must_use = "handle the error or results may be lost"]
    /// Whether the store is absent or holds no entries.
    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    #[must_use = "handle the error or results may be lost"]
    /// The set of stored query texts, as they were saved.
    pub fn queries(&self) -> Result<HashSet<String>, Error> {
        Ok(self
            .load_index()?
            .map(|index| index.entries().iter().map(|e| e.query.clone()).collect())
            .unwrap_or_default())
    }
}
