//! Doctor command - diagnostics for credentials and backends.

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;

/// Run the doctor command.
pub async fn run_doctor(settings: &Settings) -> Result<()> {
    Output::header("Samtale Doctor");
    println!();

    let mut problems = 0;

    // Credentials
    println!("{}", style("Credentials").bold());
    for (var, purpose) in [
        ("OPENAI_API_KEY", "LLM analysis, embeddings, Whisper"),
        ("ASSEMBLYAI_API_KEY", "realtime voice transcription"),
    ] {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                println!("  {} {} ({})", style("ok").green(), var, purpose);
            }
            _ => {
                println!("  {} {} not set ({})", style("missing").red(), var, purpose);
                problems += 1;
            }
        }
    }
    println!();

    // Vector store
    println!("{}", style("Vector store").bold());
    Output::kv("Provider", &settings.vector_store.provider);
    if settings.vector_store.provider == "qdrant" {
        let url = std::env::var("QDRANT_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| settings.vector_store.url.clone());
        Output::kv("URL", &url);

        match reqwest::Client::new()
            .get(format!("{}/collections", url.trim_end_matches('/')))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                println!("  {} server reachable", style("ok").green());
            }
            Ok(response) => {
                println!(
                    "  {} server responded with {}",
                    style("warn").yellow(),
                    response.status()
                );
                problems += 1;
            }
            Err(e) => {
                println!("  {} server unreachable: {}", style("fail").red(), e);
                problems += 1;
            }
        }
    }
    println!();

    // Configuration
    println!("{}", style("Configuration").bold());
    Output::kv(
        "Config file",
        &Settings::default_config_path().display().to_string(),
    );
    Output::kv("Data dir", &settings.data_dir().display().to_string());
    Output::kv("Embedding model", &settings.embedding.model);
    Output::kv("Team model", &settings.team.model);
    Output::kv(
        "Streaming endpoint",
        &settings.streaming.endpoint,
    );
    println!();

    if problems == 0 {
        Output::success("Everything looks good.");
    } else {
        Output::warning(&format!(
            "{} problem(s) found. See above for fixes.",
            problems
        ));
    }

    Ok(())
}
