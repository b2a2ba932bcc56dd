//! Qdrant REST backend.
//!
//! Talks to a Qdrant server over its HTTP API: collection management, point
//! upserts, and k-NN search with cosine distance.

use super::{RetrievedDocument, StorePoint, VectorStore};
use crate::error::{Result, SamtaleError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Qdrant-backed vector store.
pub struct QdrantStore {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantStore {
    /// Create a new store for the given server URL (e.g. `http://localhost:6333`).
    pub fn new(url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Fetch collection info, or None if the collection does not exist.
    async fn collection_info(&self, collection: &str) -> Result<Option<Value>> {
        let response = self
            .with_auth(self.http.get(self.collection_url(collection)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SamtaleError::VectorStore(format!(
                    "Collection info for '{}' failed ({}): {}",
                    collection, status, body
                )))
            }
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        Ok(self.collection_info(collection).await?.is_some())
    }

    #[instrument(skip(self))]
    async fn create_collection(&self, collection: &str, vector_size: usize) -> Result<()> {
        let body = json!({
            "vectors": {
                "size": vector_size,
                "distance": "Cosine",
            }
        });

        let response = self
            .with_auth(self.http.put(self.collection_url(collection)))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SamtaleError::VectorStore(format!(
                "Creating collection '{}' failed ({}): {}",
                collection, status, body
            )));
        }

        debug!("Created collection '{}' (size {})", collection, vector_size);
        Ok(())
    }

    async fn collection_vector_size(&self, collection: &str) -> Result<Option<usize>> {
        let Some(info) = self.collection_info(collection).await? else {
            return Ok(None);
        };

        info["result"]["config"]["params"]["vectors"]["size"]
            .as_u64()
            .map(|size| Some(size as usize))
            .ok_or_else(|| {
                SamtaleError::VectorStore(format!(
                    "Collection '{}' info is missing a vector size",
                    collection
                ))
            })
    }

    #[instrument(skip(self, point), fields(point_id = %point.id))]
    async fn upsert_point(&self, collection: &str, point: &StorePoint) -> Result<()> {
        let body = json!({
            "points": [{
                "id": point.id.to_string(),
                "vector": point.vector,
                "payload": point.payload,
            }]
        });

        let response = self
            .with_auth(
                self.http
                    .put(format!("{}/points?wait=true", self.collection_url(collection))),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SamtaleError::VectorStore(format!(
                "Upsert into '{}' failed ({}): {}",
                collection, status, body
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, query_vector))]
    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedDocument>> {
        let body = json!({
            "vector": query_vector,
            "limit": limit,
            "with_payload": true,
        });

        let response = self
            .with_auth(
                self.http
                    .post(format!("{}/points/search", self.collection_url(collection))),
            )
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SamtaleError::VectorStore(format!(
                "Search in '{}' failed ({}): {}",
                collection, status, body
            )));
        }

        let parsed: Value = response.json().await?;
        let hits = parsed["result"].as_array().cloned().unwrap_or_default();

        let results = hits.iter().map(parse_scored_point).collect();
        Ok(results)
    }

    async fn delete_collection(&self, collection: &str) -> Result<bool> {
        let response = self
            .with_auth(self.http.delete(self.collection_url(collection)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => {
                let parsed: Value = response.json().await?;
                Ok(parsed["result"].as_bool().unwrap_or(true))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SamtaleError::VectorStore(format!(
                    "Deleting collection '{}' failed ({}): {}",
                    collection, status, body
                )))
            }
        }
    }
}

/// Convert one scored point from a search response.
fn parse_scored_point(hit: &Value) -> RetrievedDocument {
    let payload = &hit["payload"];
    let id = match &hit["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    RetrievedDocument {
        id,
        text: payload["text"]
            .as_str()
            .unwrap_or("No text available")
            .to_string(),
        name: payload["name"].as_str().unwrap_or("Unknown").to_string(),
        filename: payload["filename"].as_str().map(|s| s.to_string()),
        score: hit["score"].as_f64().unwrap_or(0.0) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scored_point() {
        let hit = json!({
            "id": "5c53e1a6-0296-4c5f-8a5c-7b4e9a8d8f10",
            "score": 0.8731,
            "payload": {
                "text": "The sky is blue",
                "name": "doc1",
            }
        });

        let doc = parse_scored_point(&hit);
        assert_eq!(doc.text, "The sky is blue");
        assert_eq!(doc.name, "doc1");
        assert_eq!(doc.filename, None);
        assert!((doc.score - 0.8731).abs() < 1e-6);
    }

    #[test]
    fn test_parse_scored_point_missing_payload_fields() {
        let hit = json!({ "id": 7, "score": 0.5, "payload": {} });

        let doc = parse_scored_point(&hit);
        assert_eq!(doc.id, "7");
        assert_eq!(doc.text, "No text available");
        assert_eq!(doc.name, "Unknown");
    }

    #[test]
    fn test_base_url_is_normalized() {
        let store = QdrantStore::new("http://localhost:6333/", None);
        assert_eq!(
            store.collection_url("Default"),
            "http://localhost:6333/collections/Default"
        );
    }
}
