//! Vector store abstraction for Samtale.
//!
//! Provides a trait-based interface for different vector database backends.
//! Collections are created lazily with a fixed dimensionality and cosine
//! similarity; every upsert is validated against that dimensionality.

mod memory;
mod qdrant;

pub use memory::MemoryVectorStore;
pub use qdrant::QdrantStore;

use crate::error::{Result, SamtaleError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload stored alongside a vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    /// Original text content.
    pub text: String,
    /// Human-readable source name.
    pub name: String,
    /// Source file path, when the point was ingested from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// A point to be written to a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePoint {
    /// Unique point ID, generated fresh on each insert.
    pub id: Uuid,
    /// Dense embedding vector.
    pub vector: Vec<f32>,
    /// Payload metadata.
    pub payload: PointPayload,
}

impl StorePoint {
    /// Create a new point with a fresh ID.
    pub fn new(vector: Vec<f32>, payload: PointPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            payload,
        }
    }
}

/// A retrieval result, ranked by similarity score.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    /// Point ID.
    pub id: String,
    /// Original text content.
    pub text: String,
    /// Human-readable source name.
    pub name: String,
    /// Source file path, if any.
    pub filename: Option<String>,
    /// Similarity score (higher is better).
    pub score: f32,
}

impl RetrievedDocument {
    /// The best available source label: filename when present, name otherwise.
    pub fn source(&self) -> &str {
        self.filename.as_deref().unwrap_or(&self.name)
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check whether a collection exists.
    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    /// Create a collection with the given dimensionality and cosine metric.
    async fn create_collection(&self, collection: &str, vector_size: usize) -> Result<()>;

    /// Get the configured vector size of a collection, if it exists.
    async fn collection_vector_size(&self, collection: &str) -> Result<Option<usize>>;

    /// Write a point to a collection.
    async fn upsert_point(&self, collection: &str, point: &StorePoint) -> Result<()>;

    /// k-NN search, returning results ordered by descending score.
    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>>;

    /// Delete a collection. Returns whether it existed.
    async fn delete_collection(&self, collection: &str) -> Result<bool>;

    /// Create the collection if absent; otherwise validate its dimensionality.
    ///
    /// A collection's vector size is fixed at creation time. Reusing an
    /// existing collection with a different embedding size is an error, not
    /// a silent coercion.
    async fn ensure_collection(&self, collection: &str, vector_size: usize) -> Result<()> {
        match self.collection_vector_size(collection).await? {
            Some(existing) if existing == vector_size => Ok(()),
            Some(existing) => Err(SamtaleError::DimensionMismatch {
                collection: collection.to_string(),
                expected: existing,
                actual: vector_size,
            }),
            None => self.create_collection(collection, vector_size).await,
        }
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_point_ids_are_fresh() {
        let payload = PointPayload {
            text: "content".to_string(),
            name: "note".to_string(),
            filename: None,
        };
        let a = StorePoint::new(vec![1.0], payload.clone());
        let b = StorePoint::new(vec![1.0], payload);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_source_prefers_filename() {
        let doc = RetrievedDocument {
            id: "1".to_string(),
            text: "t".to_string(),
            name: "note".to_string(),
            filename: Some("doc.txt".to_string()),
            score: 0.9,
        };
        assert_eq!(doc.source(), "doc.txt");

        let doc = RetrievedDocument {
            filename: None,
            ..doc
        };
        assert_eq!(doc.source(), "note");
    }
}
