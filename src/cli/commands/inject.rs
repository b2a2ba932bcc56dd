//! Knowledge ingestion command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::KnowledgeClient;
use anyhow::Result;
use std::path::Path;

/// Run the inject command: ingest text, a file, or a folder.
pub async fn run_inject(
    text: Option<String>,
    file: Option<String>,
    folder: Option<String>,
    collection: Option<String>,
    name: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Knowledge) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = KnowledgeClient::from_settings(&settings)?;
    let collection = collection.unwrap_or_else(|| client.default_collection().to_string());

    if let Some(text) = text {
        let name = name.unwrap_or_else(|| "text_document".to_string());
        let spinner = Output::spinner("Embedding and storing text...");
        let result = client.upsert_text(&text, &collection, &name).await;
        spinner.finish_and_clear();

        match result {
            Ok(id) => Output::success(&format!(
                "Text uploaded with ID: {} to collection '{}'",
                id, collection
            )),
            Err(e) => {
                Output::error(&format!("Error processing text: {}", e));
                return Err(e.into());
            }
        }
    } else if let Some(file) = file {
        let spinner = Output::spinner("Embedding and storing document...");
        let result = client.upsert_document(Path::new(&file), &collection).await;
        spinner.finish_and_clear();

        match result {
            Ok(Some(id)) => Output::success(&format!(
                "Document '{}' uploaded with ID: {} to collection '{}'",
                file, id, collection
            )),
            Ok(None) => Output::warning(&format!("File {} is empty, nothing stored", file)),
            Err(e) => {
                Output::error(&format!("Error processing file '{}': {}", file, e));
                return Err(e.into());
            }
        }
    } else if let Some(folder) = folder {
        let spinner = Output::spinner("Embedding and storing folder contents...");
        let result = client.upsert_folder(Path::new(&folder), &collection).await;
        spinner.finish_and_clear();

        match result {
            Ok(id) => Output::success(&format!(
                "Folder '{}' uploaded with ID: {} to collection '{}'",
                folder, id, collection
            )),
            Err(e) => {
                Output::error(&format!("Error processing folder '{}': {}", folder, e));
                return Err(e.into());
            }
        }
    } else {
        Output::error("Please provide --text, --file, or --folder");
        anyhow::bail!("No ingestion input given");
    }

    Ok(())
}
