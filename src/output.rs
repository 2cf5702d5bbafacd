//! JSON response types and formatting for CLI output.

use serde::Serialize;

/// Response for a stored entry.
#[derive(Serialize)]
pub struct SaveResponse {
    pub status: String,
    pub id: String,
}

/// Response for a threshold lookup.
#[derive(Serialize)]
pub struct SearchResponse {
    /// "hit" or "miss".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit: Option<NeighborItem>,
}

/// Response for a nearest-neighbour listing.
#[derive(Serialize)]
pub struct NearestResponse {
    pub results: Vec<NeighborItem>,
}

/// A matched entry with its distance to the query.
#[derive(Serialize)]
pub struct NeighborItem {
    pub id: String,
    pub query: String,
    pub answer: String,
    /// Squared-L2 distance (lower is closer).
    pub distance: f64,
    /// Cosine similarity implied by the distance, `1 - distance / 2`.
    pub similarity: f64,
}

impl From<semcache::CacheHit> for NeighborItem {
    fn from(hit: semcache::CacheHit) -> Self {
        NeighborItem {
            similarity: 1.0 - hit.distance / 2.0,
            id: hit.id,
            query: hit.query,
            answer: hit.answer,
            distance: hit.distance,
        }
    }
}

/// Response for listing stored entries.
#[derive(Serialize)]
pub struct ListResponse {
    pub entries: Vec<ListItem>,
}

/// Individual list item.
#[derive(Serialize)]
pub struct ListItem {
    pub id: String,
    pub query: String,
    pub answer: String,
    pub created_at: String,
}

/// Response for import operations.
#[derive(Serialize)]
pub struct ImportResponse {
    pub status: String,
    pub total: usize,
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
}

/// Response describing the configured store.
#[derive(Serialize)]
pub struct StatsResponse {
    pub store_path: String,
    pub model: String,
    pub entries: usize,
    pub distance_threshold: f64,
}

/// Response for a failed command.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_save_response() {
        let response = SaveResponse {
            status: "saved".to_string(),
            id: "test-id".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"saved\""));
        assert!(json.contains("\"id\":\"test-id\""));
    }

    #[test]
    fn test_serialize_search_miss_omits_hit() {
        let response = SearchResponse {
            status: "miss".to_string(),
            hit: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, "{\"status\":\"miss\"}");
    }

    #[test]
    fn test_neighbor_item_similarity() {
        let item = NeighborItem::from(semcache::CacheHit {
            id: "id".to_string(),
            query: "q".to_string(),
            answer: "a".to_string(),
            distance: 0.5,
        });
        assert_eq!(item.similarity, 0.75);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"distance\":0.5"));
    }
}
