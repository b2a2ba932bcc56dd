//! Configuration management for Samtale.

mod prompts;
mod settings;

pub use prompts::{Prompts, TeamPrompt};
pub use settings::{
    EmbeddingSettings, GeneralSettings, PromptSettings, Settings, StreamingSettings,
    TeamSettings, TranscriptionSettings, VectorStoreSettings,
};
