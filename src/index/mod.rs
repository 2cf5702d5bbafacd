//! In-memory vector index of cached question/answer pairs.
//!
//! This module provides:
//! - `VectorIndex`: the aggregate persisted as one unit per store
//! - `CacheEntry`: a single cached pair with its query embedding
//! - `distance`: embedding validation and squared-L2 distance
//! - `snapshot`: atomic load/save of the index under a store directory
//!
//! Nearest-neighbour lookup is an exact linear scan.

pub mod distance;
pub mod snapshot;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Error;

use self::distance::squared_l2;

/// A cached question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: String,
    pub query: String,
    pub answer: String,
    /// Unit-length embedding of `query`.
    pub embedding: Vec<f32>,
    pub created_at: String,
}

impl CacheEntry {
    /// Create an entry with a fresh id and the current timestamp.
    pub fn new(query: &str, answer: &str, embedding: Vec<f32>) -> Self {
        CacheEntry {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            answer: answer.to_string(),
            embedding,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// An entry together with its distance to a probe vector.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub entry: &'a CacheEntry,
    pub distance: f64,
}

/// All entries of one store, embedded by a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    pub(crate) version: u32,
    model: String,
    dimensions: usize,
    entries: Vec<CacheEntry>,
}

impl VectorIndex {
    /// Snapshot format version.
    pub const VERSION: u32 = 1;

    /// Create an empty index for vectors of `dimensions` from `model`.
    pub fn new(model: &str, dimensions: usize) -> Self {
        VectorIndex {
            version: Self::VERSION,
            model: model.to_string(),
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the entry's embedding length
    /// differs from the index dimensionality.
    pub fn push(&mut self, entry: CacheEntry) -> Result<(), Error> {
        self.check_dimensions(&entry.embedding)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Ensure `vec` has the index dimensionality.
    pub fn check_dimensions(&self, vec: &[f32]) -> Result<(), Error> {
        if vec.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: vec.len(),
            });
        }
        Ok(())
    }

    /// The entry closest to `probe`. Ties go to the earliest inserted entry.
    pub fn nearest(&self, probe: &[f32]) -> Result<Option<Neighbor<'_>>, Error> {
        self.check_dimensions(probe)?;

        let mut best: Option<Neighbor<'_>> = None;
        for entry in &self.entries {
            let distance = squared_l2(probe, &entry.embedding)?;
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Neighbor { entry, distance });
            }
        }
        Ok(best)
    }

    /// The `k` entries closest to `probe`, nearest first.
    pub fn nearest_k(&self, probe: &[f32], k: usize) -> Result<Vec<Neighbor<'_>>, Error> {
        self.check_dimensions(probe)?;

        let mut neighbors = self
            .entries
            .iter()
            .map(|entry| {
                squared_l2(probe, &entry.embedding).map(|distance| Neighbor { entry, distance })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Stable sort keeps insertion order among equal distances.
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Verify the invariants a freshly decoded snapshot must satisfy.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("missing embedding model".to_string());
        }
        if self.dimensions == 0 {
            return Err("dimensions must be greater than 0".to_string());
        }
        for entry in &self.entries {
            if entry.embedding.len() != self.dimensions {
                return Err(format!(
                    "entry {} has {} dimensions, expected {}",
                    entry.id,
                    entry.embedding.len(),
                    self.dimensions
                ));
            }
            if entry.embedding.iter().any(|x| !x.is_finite()) {
                return Err(format!("entry {} has non-finite values", entry.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[(&str, [f32; 2])]) -> VectorIndex {
        let mut index = VectorIndex::new("test/model", 2);
        for (name, v) in vectors {
            index.push(CacheEntry::new(name, name, v.to_vec())).unwrap();
        }
        index
    }

    #[test]
    fn test_nearest_on_empty_index() {
        let index = VectorIndex::new("test/model", 2);
        assert!(index.nearest(&[1.0, 0.0]).unwrap().is_none());
    }

    #[test]
    fn test_nearest_picks_smallest_distance() {
        let index = index_with(&[("east", [1.0, 0.0]), ("north", [0.0, 1.0]), ("west", [-1.0, 0.0])]);
        let hit = index.nearest(&[0.1, 0.99]).unwrap().unwrap();
        assert_eq!(hit.entry.query, "north");
    }

    #[test]
    fn test_nearest_tie_prefers_earliest() {
        let index = index_with(&[("first", [1.0, 0.0]), ("second", [1.0, 0.0])]);
        let hit = index.nearest(&[1.0, 0.0]).unwrap().unwrap();
        assert_eq!(hit.entry.query, "first");
    }

    #[test]
    fn test_nearest_k_orders_by_distance() {
        let index = index_with(&[("west", [-1.0, 0.0]), ("east", [1.0, 0.0]), ("north", [0.0, 1.0])]);
        let hits = index.nearest_k(&[1.0, 0.0], 2).unwrap();
        let names: Vec<_> = hits.iter().map(|n| n.entry.query.as_str()).collect();
        assert_eq!(names, vec!["east", "north"]);
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn test_nearest_rejects_wrong_dimensions() {
        let index = index_with(&[("east", [1.0, 0.0])]);
        assert!(matches!(
            index.nearest(&[1.0, 0.0, 0.0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_push_rejects_wrong_dimensions() {
        let mut index = VectorIndex::new("test/model", 2);
        let result = index.push(CacheEntry::new("q", "a", vec![1.0]));
        assert!(result.is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_consistency_requires_model() {
        let index = VectorIndex::new(" ", 2);
        assert!(index.check_consistency().is_err());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = CacheEntry::new("q", "a", vec![1.0]);
        let b = CacheEntry::new("q", "a", vec![1.0]);
        assert_ne!(a.id, b.id);
    }
}
