//! File transcription command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::KnowledgeClient;
use crate::transcription::FileTranscriber;
use anyhow::Result;
use std::path::Path;

/// Run the transcribe command.
pub async fn run_transcribe(
    source: &str,
    output: Option<String>,
    inject: bool,
    name: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcribe) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let source_path = Path::new(source);
    let source_name = name.unwrap_or_else(|| {
        source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Audio Transcript")
            .to_string()
    });

    Output::info(&format!("Transcribing audio file: {}", source));

    let transcriber = FileTranscriber::new(&settings.transcription.model);
    let spinner = Output::spinner("Transcribing...");
    let result = transcriber.transcribe_file(source_path).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(transcript) => transcript,
        Err(e) => {
            Output::error(&format!("Error during transcription: {}", e));
            return Err(e.into());
        }
    };

    Output::success("Transcription completed");
    Output::kv("Transcript length", &format!("{} characters", transcript.len()));

    if let Some(output) = output {
        let path =
            crate::files::save_text_to_file(&transcript, Some(&output), &settings.output_dir())?;
        Output::info(&format!("Transcript saved to: {}", path.display()));
    }

    if inject {
        Output::info("Injecting transcript into the knowledge base");
        let client = KnowledgeClient::from_settings(&settings)?;
        let collection = client.default_collection().to_string();

        match client.upsert_text(&transcript, &collection, &source_name).await {
            Ok(id) => Output::success(&format!(
                "Transcript stored as point {} in collection '{}'",
                id, collection
            )),
            Err(e) => Output::error(&format!("Injection failed: {}", e)),
        }
    }

    Ok(())
}
