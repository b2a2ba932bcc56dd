//! In-memory vector store implementation.
//!
//! Useful for testing and offline runs. Collections carry the same
//! fixed-dimensionality invariant as the Qdrant backend.

use super::{cosine_similarity, RetrievedDocument, StorePoint, VectorStore};
use crate::error::{Result, SamtaleError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

struct Collection {
    vector_size: usize,
    points: HashMap<String, StorePoint>,
}

/// In-memory vector store.
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of points in a collection (0 if absent).
    pub fn point_count(&self, collection: &str) -> usize {
        let collections = self.collections.read().unwrap();
        collections
            .get(collection)
            .map(|c| c.points.len())
            .unwrap_or(0)
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        let collections = self.collections.read().unwrap();
        Ok(collections.contains_key(collection))
    }

    async fn create_collection(&self, collection: &str, vector_size: usize) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        collections.entry(collection.to_string()).or_insert(Collection {
            vector_size,
            points: HashMap::new(),
        });
        Ok(())
    }

    async fn collection_vector_size(&self, collection: &str) -> Result<Option<usize>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.get(collection).map(|c| c.vector_size))
    }

    async fn upsert_point(&self, collection: &str, point: &StorePoint) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let entry = collections.get_mut(collection).ok_or_else(|| {
            SamtaleError::VectorStore(format!("Collection '{}' does not exist", collection))
        })?;

        if point.vector.len() != entry.vector_size {
            return Err(SamtaleError::DimensionMismatch {
                collection: collection.to_string(),
                expected: entry.vector_size,
                actual: point.vector.len(),
            });
        }

        entry.points.insert(point.id.to_string(), point.clone());
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        let collections = self.collections.read().unwrap();
        let Some(entry) = collections.get(collection) else {
            return Err(SamtaleError::VectorStore(format!(
                "Collection '{}' does not exist",
                collection
            )));
        };

        let mut results: Vec<RetrievedDocument> = entry
            .points
            .values()
            .map(|point| RetrievedDocument {
                id: point.id.to_string(),
                text: point.payload.text.clone(),
                name: point.payload.name.clone(),
                filename: point.payload.filename.clone(),
                score: cosine_similarity(query_vector, &point.vector),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_collection(&self, collection: &str) -> Result<bool> {
        let mut collections = self.collections.write().unwrap();
        Ok(collections.remove(collection).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::PointPayload;

    fn payload(text: &str, name: &str) -> PointPayload {
        PointPayload {
            text: text.to_string(),
            name: name.to_string(),
            filename: None,
        }
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = MemoryVectorStore::new();
        store.ensure_collection("test", 3).await.unwrap();

        store
            .upsert_point("test", &StorePoint::new(vec![1.0, 0.0, 0.0], payload("hello", "a")))
            .await
            .unwrap();
        store
            .upsert_point("test", &StorePoint::new(vec![0.0, 1.0, 0.0], payload("goodbye", "b")))
            .await
            .unwrap();

        let results = store.search("test", &[1.0, 0.1, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "hello");
        assert!(results[0].score > results[1].score);

        let capped = store.search("test", &[1.0, 0.1, 0.0], 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_collection_is_idempotent() {
        let store = MemoryVectorStore::new();
        store.ensure_collection("test", 4).await.unwrap();
        store
            .upsert_point("test", &StorePoint::new(vec![0.0; 4], payload("t", "t")))
            .await
            .unwrap();

        store.ensure_collection("test", 4).await.unwrap();
        assert!(store.collection_exists("test").await.unwrap());
        // Re-ensuring does not wipe existing points.
        assert_eq!(store.point_count("test"), 1);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let store = MemoryVectorStore::new();
        store.ensure_collection("test", 4).await.unwrap();

        let err = store.ensure_collection("test", 8).await.unwrap_err();
        assert!(matches!(err, SamtaleError::DimensionMismatch { .. }));

        let err = store
            .upsert_point("test", &StorePoint::new(vec![1.0, 2.0], payload("short", "s")))
            .await
            .unwrap_err();
        assert!(matches!(err, SamtaleError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_delete_collection_reports_existence() {
        let store = MemoryVectorStore::new();
        store.ensure_collection("test", 2).await.unwrap();

        assert!(store.delete_collection("test").await.unwrap());
        assert!(!store.delete_collection("test").await.unwrap());
    }
}
