//! Clear command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::rag::KnowledgeClient;
use anyhow::Result;

/// Run the clear command: delete a whole collection.
pub async fn run_clear(collection: Option<String>, settings: Settings) -> Result<()> {
    let client = KnowledgeClient::from_settings(&settings)?;
    let collection = collection.unwrap_or_else(|| client.default_collection().to_string());

    match client.clear_collection(&collection).await {
        Ok(true) => Output::success(&format!("Collection '{}' cleared successfully", collection)),
        Ok(false) => Output::info(&format!("Collection '{}' does not exist", collection)),
        Err(e) => {
            Output::error(&format!("Error clearing collection '{}': {}", collection, e));
            return Err(e.into());
        }
    }

    Ok(())
}
