//! Samtale - Voice-Driven Analysis Teams
//!
//! A CLI tool that pairs a retrieval-augmented knowledge base with realtime
//! voice transcription and LLM analysis teams.
//!
//! The name "Samtale" comes from the Norwegian word for "conversation."
//!
//! # Overview
//!
//! Samtale allows you to:
//! - Ingest documents and transcripts into a vector knowledge base
//! - Ask finance, medical, or legal analysis teams questions with RAG context
//! - Transcribe audio files and stream live speech from the microphone
//! - Hold hands-free voice conversations with an analysis team
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `rag` - Knowledge client (ingestion and retrieval)
//! - `transcription` - File transcription and streaming utterance segmentation
//! - `audio` - Microphone capture
//! - `agent` - LLM tool-calling agent and analysis teams
//! - `conversation` - Voice conversation loop
//! - `memory` - Per-user conversation memory
//!
//! # Example
//!
//! ```rust,no_run
//! use samtale::config::Settings;
//! use samtale::rag::KnowledgeClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = KnowledgeClient::from_settings(&settings)?;
//!
//!     let id = client.upsert_text("The sky is blue.", "Default", "weather note").await?;
//!     println!("Stored point {}", id);
//!
//!     let context = client.context_for_query("What color is the sky?", "Default", 3).await?;
//!     println!("{}", context);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod audio;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod embedding;
pub mod error;
pub mod files;
pub mod memory;
pub mod openai;
pub mod rag;
pub mod transcription;
pub mod vector_store;

pub use error::{Result, SamtaleError};
