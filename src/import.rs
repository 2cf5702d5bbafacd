//! Bulk import of question/answer pairs (e.g. a FAQ list) from JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::SemanticCache;
use crate::embedding::Embedder;
use crate::errors::Error;

/// One pair in an import file.
///
/// `question` is accepted as an alias of `query` so FAQ exports load as-is.
#[derive(Debug, Deserialize)]
pub struct JsonPair {
    #[serde(alias = "question")]
    pub query: String,
    pub answer: String,
}

/// Import statistics for reporting.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportStats {
    pub total: usize,
    pub imported: usize,
    pub skipped_duplicates: usize,
    pub skipped_invalid: usize,
}

/// Import pairs from a JSON array of `{"query": ..., "answer": ...}` objects.
///
/// Pairs with an empty query or answer are skipped, as are queries already
/// in the store or repeated earlier in the file. The rest are stored with a
/// single persist.
///
/// # Errors
///
/// Returns error if the file is missing or not valid JSON, or if the cache
/// fails to load, embed, or persist.
pub fn import_from_json<E: Embedder>(
    json_path: &Path,
    cache: &mut SemanticCache<E>,
) -> Result<ImportStats, Error> {
    if !json_path.exists() {
        return Err(Error::FileNotFound(json_path.to_path_buf()));
    }

    let content = std::fs::read_to_string(json_path)?;
    let pairs: Vec<JsonPair> = serde_json::from_str(&content)?;
    import_pairs(pairs, cache)
}

fn import_pairs<E: Embedder>(
    pairs: Vec<JsonPair>,
    cache: &mut SemanticCache<E>,
) -> Result<ImportStats, Error> {
    let mut stats = ImportStats {
        total: pairs.len(),
        ..ImportStats::default()
    };

    let mut seen: HashSet<String> = cache
        .queries()?
        .iter()
        .map(|q| q.trim().to_string())
        .collect();
    let mut accepted = Vec::new();

    for pair in pairs {
        let query = pair.query.trim();
        if query.is_empty() || pair.answer.trim().is_empty() {
            tracing::warn!(query = %pair.query, "skipping pair with empty query or answer");
            stats.skipped_invalid += 1;
            continue;
        }

        if seen.contains(query) {
            stats.skipped_duplicates += 1;
            continue;
        }

        seen.insert(query.to_string());
        accepted.push((pair.query.clone(), pair.answer));
    }

    stats.imported = cache.save_batch(&accepted)?.len();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Embeds by text length so every distinct test query differs.
    struct LengthEmbedder;

    impl Embedder for LengthEmbedder {
        fn model_id(&self) -> &str {
            "test/length"
        }

        fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error> {
            let angle = text.len() as f32;
            Ok(vec![angle.cos(), angle.sin()])
        }
    }

    fn cache(dir: &TempDir) -> SemanticCache<LengthEmbedder> {
        SemanticCache::with_embedder(&dir.path().join("cache"), LengthEmbedder, 0.05).unwrap()
    }

    #[test]
    fn test_json_pair_accepts_question_alias() {
        let pair: JsonPair =
            serde_json::from_str(r#"{"question": "Can I pay by card?", "answer": "Yes"}"#).unwrap();
        assert_eq!(pair.query, "Can I pay by card?");
        assert_eq!(pair.answer, "Yes");
    }

    #[test]
    fn test_import_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache(&dir);
        let result = import_from_json(&dir.path().join("missing.json"), &mut cache);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_import_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(&path, "[{\"query\": ").unwrap();
        let mut cache = cache(&dir);

        assert!(matches!(
            import_from_json(&path, &mut cache),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_import_counts_and_skips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(
            &path,
            r#"[
                {"query": "a", "answer": "A"},
                {"question": "bb", "answer": "B"},
                {"query": "a", "answer": "A again"},
                {"query": "   ", "answer": "blank query"},
                {"query": "ccc", "answer": ""},
                {"query": "already", "answer": "stored"}
            ]"#,
        )
        .unwrap();

        let mut cache = cache(&dir);
        cache.save("already", "stored").unwrap();

        let stats = import_from_json(&path, &mut cache).unwrap();

        assert_eq!(stats.total, 6);
        assert_eq!(stats.imported, 2);
        assert_eq!(stats.skipped_duplicates, 2);
        assert_eq!(stats.skipped_invalid, 2);
        assert_eq!(cache.len().unwrap(), 3);
        assert_eq!(cache.search("bb").unwrap(), Some("B".to_string()));
    }

    #[test]
    fn test_import_keeps_query_text_and_ignores_padding_for_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(
            &path,
            r#"[
                {"query": "already", "answer": "again"},
                {"query": " padded ", "answer": "P"}
            ]"#,
        )
        .unwrap();

        let mut cache = cache(&dir);
        cache.save(" already\n", "stored").unwrap();

        let stats = import_from_json(&path, &mut cache).unwrap();
        assert_eq!(stats.imported, 1);
        assert_eq!(stats.skipped_duplicates, 1);

        let queries = cache.queries().unwrap();
        assert!(queries.contains(" already\n"));
        assert!(queries.contains(" padded "));
    }

    #[test]
    fn test_import_empty_array_creates_no_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(&path, "[]").unwrap();
        let mut cache = cache(&dir);

        let stats = import_from_json(&path, &mut cache).unwrap();
        assert_eq!(stats.imported, 0);
        assert!(!dir.path().join("cache").exists());
    }
}
