//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::KnowledgeClient;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
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

    let spinner = Output::spinner("Searching...");
    let results = client.retrieve(query, &collection, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(documents) => {
            if documents.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", documents.len()));
                for document in &documents {
                    Output::search_result(document.source(), document.score, &document.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
