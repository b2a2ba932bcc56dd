//! Context command implementation.
//!
//! Prints the formatted context block exactly as the analysis teams see it.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::KnowledgeClient;
use anyhow::Result;

/// Run the context command.
pub async fn run_context(
    query: &str,
    collection: Option<String>,
    limit: usize,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Knowledge) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = KnowledgeClient::from_settings(&settings)?;
    let collection = collection.unwrap_or_else(|| client.default_collection().to_string());

    let spinner = Output::spinner("Building context...");
    let context = client.context_for_query(query, &collection, limit).await;
    spinner.finish_and_clear();

    match context {
        Ok(context) => println!("{}", context),
        Err(e) => {
            Output::error(&format!("Context retrieval failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
