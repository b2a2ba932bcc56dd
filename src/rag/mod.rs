//! Knowledge client: ingestion and retrieval over the vector store.
//!
//! Composes an embedder and a vector store into the read/write paths the
//! analysis teams use: embed text, persist it with metadata, and retrieve
//! semantically similar entries as ranked results or a formatted context
//! block.

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SamtaleError};
use crate::vector_store::{
    MemoryVectorStore, PointPayload, QdrantStore, RetrievedDocument, StorePoint, VectorStore,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Sentinel returned when retrieval produces no context.
pub const NO_CONTEXT: &str = "No relevant context found.";

/// Client for the knowledge base: embeds, stores, and retrieves text.
pub struct KnowledgeClient {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    default_collection: String,
}

impl KnowledgeClient {
    /// Create a client from explicit components.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        default_collection: &str,
    ) -> Self {
        Self {
            store,
            embedder,
            default_collection: default_collection.to_string(),
        }
    }

    /// Build a client from settings.
    ///
    /// `QDRANT_URL` and `QDRANT_API_KEY` in the environment override the
    /// configured values.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store: Arc<dyn VectorStore> = match settings.vector_store.provider.as_str() {
            "memory" => Arc::new(MemoryVectorStore::new()),
            "qdrant" => {
                let url = std::env::var("QDRANT_URL")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| settings.vector_store.url.clone());
                let api_key = std::env::var("QDRANT_API_KEY")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .or_else(|| settings.vector_store.api_key.clone());
                Arc::new(QdrantStore::new(&url, api_key))
            }
            other => {
                return Err(SamtaleError::Config(format!(
                    "Unknown vector store provider: {}",
                    other
                )))
            }
        };

        Ok(Self::new(store, embedder, &settings.vector_store.collection))
    }

    /// The collection used when the caller does not name one.
    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    /// Embed `text`, ensure the collection exists, and store the text with
    /// its metadata. Returns the id of the new point.
    #[instrument(skip(self, text), fields(collection = %collection, name = %name))]
    pub async fn upsert_text(&self, text: &str, collection: &str, name: &str) -> Result<String> {
        let vector = self.embedder.embed(text).await?;
        self.store.ensure_collection(collection, vector.len()).await?;

        let point = StorePoint::new(
            vector,
            PointPayload {
                text: text.to_string(),
                name: name.to_string(),
                filename: None,
            },
        );
        let id = point.id.to_string();

        self.store.upsert_point(collection, &point).await?;
        info!("Stored text as point {} in collection '{}'", id, collection);
        Ok(id)
    }

    /// Ingest a whole file. The payload carries the path as both `filename`
    /// and `name`. An empty file is a warned no-op; a missing file is a
    /// distinct error.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn upsert_document(
        &self,
        file_path: &Path,
        collection: &str,
    ) -> Result<Option<String>> {
        if !file_path.is_file() {
            return Err(SamtaleError::InvalidInput(format!(
                "File '{}' not found",
                file_path.display()
            )));
        }

        let text = std::fs::read_to_string(file_path)?;
        if text.trim().is_empty() {
            warn!("File {} is empty, nothing to ingest", file_path.display());
            return Ok(None);
        }

        let path_str = file_path.display().to_string();
        let vector = self.embedder.embed(&text).await?;
        self.store.ensure_collection(collection, vector.len()).await?;

        let point = StorePoint::new(
            vector,
            PointPayload {
                text,
                name: path_str.clone(),
                filename: Some(path_str),
            },
        );
        let id = point.id.to_string();

        self.store.upsert_point(collection, &point).await?;
        info!(
            "Stored document '{}' as point {} in collection '{}'",
            file_path.display(),
            id,
            collection
        );
        Ok(Some(id))
    }

    /// Ingest the concatenated contents of every regular file in a folder.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn upsert_folder(&self, folder: &Path, collection: &str) -> Result<String> {
        let text = crate::files::read_folder_text(folder)?;
        if text.trim().is_empty() {
            return Err(SamtaleError::InvalidInput(format!(
                "Folder '{}' contains no readable text",
                folder.display()
            )));
        }

        self.upsert_text(&text, collection, &folder.display().to_string())
            .await
    }

    /// k-NN retrieval: embed the query and return up to `limit` results
    /// ordered by descending similarity score.
    ///
    /// A collection that does not exist yet yields an empty result, not an
    /// error; backend failures are errors the caller can distinguish.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn retrieve(
        &self,
        query: &str,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        if !self.store.collection_exists(collection).await? {
            debug!("Collection '{}' does not exist, nothing to retrieve", collection);
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        let results = self.store.search(collection, &query_vector, limit).await?;

        debug!("Retrieved {} results from '{}'", results.len(), collection);
        Ok(results)
    }

    /// Retrieve and format results as a context block for a prompt.
    ///
    /// Returns [`NO_CONTEXT`] when nothing matches.
    pub async fn context_for_query(
        &self,
        query: &str,
        collection: &str,
        limit: usize,
    ) -> Result<String> {
        let results = self.retrieve(query, collection, limit).await?;

        if results.is_empty() {
            return Ok(NO_CONTEXT.to_string());
        }

        let context_parts: Vec<String> = results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "Document {} (from {}, score: {:.3}):\n{}",
                    i + 1,
                    result.source(),
                    result.score,
                    result.text
                )
            })
            .collect();

        Ok(context_parts.join("\n\n---\n\n"))
    }

    /// Delete a whole collection. Returns whether it existed; deleting an
    /// absent collection is not an error.
    pub async fn clear_collection(&self, collection: &str) -> Result<bool> {
        let existed = self.store.delete_collection(collection).await?;
        if existed {
            info!("Collection '{}' cleared", collection);
        } else {
            info!("Collection '{}' does not exist", collection);
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Embedder with fixed vectors per known text.
    struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        dimensions: usize,
    }

    impl StubEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(3);
            Self {
                vectors: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                dimensions,
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.trim().is_empty() {
                return Err(SamtaleError::Embedding("Cannot embed empty text".to_string()));
            }
            Ok(self
                .vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dimensions]))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    fn client_with(entries: &[(&str, Vec<f32>)]) -> KnowledgeClient {
        KnowledgeClient::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(StubEmbedder::new(entries)),
            "Default",
        )
    }

    #[tokio::test]
    async fn test_self_retrieval() {
        let client = client_with(&[
            ("The sky is blue", vec![1.0, 0.0, 0.0]),
            ("What color is the sky?", vec![0.9, 0.1, 0.0]),
            ("Grass is green", vec![0.0, 1.0, 0.0]),
        ]);

        client.upsert_text("The sky is blue", "T", "doc1").await.unwrap();
        client.upsert_text("Grass is green", "T", "doc2").await.unwrap();

        let results = client.retrieve("What color is the sky?", "T", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "doc1");
        assert_eq!(results[0].text, "The sky is blue");
    }

    #[tokio::test]
    async fn test_retrieve_missing_collection_is_empty() {
        let client = client_with(&[("query", vec![1.0, 0.0, 0.0])]);
        let results = client.retrieve("query", "nowhere", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_context_for_query_sentinel() {
        let client = client_with(&[("anything", vec![1.0, 0.0, 0.0])]);
        let context = client.context_for_query("anything", "nowhere", 3).await.unwrap();
        assert_eq!(context, NO_CONTEXT);
    }

    #[tokio::test]
    async fn test_context_for_query_format() {
        let client = client_with(&[
            ("The sky is blue", vec![1.0, 0.0, 0.0]),
            ("What color is the sky?", vec![1.0, 0.0, 0.0]),
        ]);

        client.upsert_text("The sky is blue", "T", "doc1").await.unwrap();

        let context = client
            .context_for_query("What color is the sky?", "T", 3)
            .await
            .unwrap();
        assert!(context.starts_with("Document 1 (from doc1, score: "));
        assert!(context.contains("):\nThe sky is blue"));
        // Three-decimal score formatting
        assert!(context.contains("score: 1.000"));
    }

    #[tokio::test]
    async fn test_context_separator_between_documents() {
        let client = client_with(&[
            ("alpha", vec![1.0, 0.0, 0.0]),
            ("beta", vec![0.9, 0.1, 0.0]),
            ("q", vec![1.0, 0.0, 0.0]),
        ]);

        client.upsert_text("alpha", "T", "a").await.unwrap();
        client.upsert_text("beta", "T", "b").await.unwrap();

        let context = client.context_for_query("q", "T", 3).await.unwrap();
        assert!(context.contains("\n\n---\n\n"));
        assert!(context.contains("Document 2 (from b, "));
    }

    #[tokio::test]
    async fn test_upsert_document_empty_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n").unwrap();

        let client = client_with(&[]);
        let id = client.upsert_document(&path, "T").await.unwrap();
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_upsert_document_missing_file_is_distinct_error() {
        let client = client_with(&[]);
        let err = client
            .upsert_document(Path::new("/does/not/exist.txt"), "T")
            .await
            .unwrap_err();
        assert!(matches!(err, SamtaleError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_upsert_document_sets_filename_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "Remember the milk").unwrap();

        let store = Arc::new(MemoryVectorStore::new());
        let path_str = path.display().to_string();
        let client = KnowledgeClient::new(
            store.clone(),
            Arc::new(StubEmbedder::new(&[
                ("Remember the milk", vec![1.0, 0.0, 0.0]),
                ("milk", vec![1.0, 0.0, 0.0]),
            ])),
            "Default",
        );

        client.upsert_document(&path, "T").await.unwrap().unwrap();

        let results = client.retrieve("milk", "T", 1).await.unwrap();
        assert_eq!(results[0].filename.as_deref(), Some(path_str.as_str()));
        assert_eq!(results[0].name, path_str);
        assert_eq!(results[0].source(), path_str);
    }

    #[tokio::test]
    async fn test_clear_collection_absent_is_not_an_error() {
        let client = client_with(&[]);
        assert!(!client.clear_collection("nowhere").await.unwrap());
    }
}
