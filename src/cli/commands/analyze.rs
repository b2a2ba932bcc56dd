//! Team analysis command implementation (finance, medical, legal).

use crate::agent::{AnalysisTeam, TeamKind};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::memory::ConversationMemory;
use crate::rag::KnowledgeClient;
use anyhow::Result;
use std::sync::Arc;

/// Run a one-shot analysis with the given team.
pub async fn run_analyze(
    kind: TeamKind,
    query: &str,
    user: &str,
    model: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Analyze) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let knowledge = Arc::new(KnowledgeClient::from_settings(&settings)?);
    let memory = match ConversationMemory::open(&settings.memory_db_path()) {
        Ok(memory) => Some(Arc::new(memory)),
        Err(e) => {
            Output::warning(&format!("Memory unavailable: {}", e));
            None
        }
    };

    let team = AnalysisTeam::build(kind, &settings, &prompts, knowledge, memory, user, model);

    Output::info(&format!("Running {} analysis for: {}", kind, query));
    Output::kv("User", user);
    if let Some(disclaimer) = team.disclaimer() {
        Output::warning(disclaimer);
    }

    let spinner = Output::spinner("Analyzing...");
    let result = team.analyze(query).await;
    spinner.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("Error during analysis: {}", e));
            return Err(e.into());
        }
    };

    println!("\n{}\n", response.content);

    if !response.tool_calls.is_empty() {
        Output::kv("Tool calls", &response.tool_calls.len().to_string());
    }

    if let Some(output) = output {
        let path =
            crate::files::save_text_to_file(&response.content, Some(&output), &settings.output_dir())?;
        Output::info(&format!("Results saved to: {}", path.display()));
    }

    Output::success(&format!("{} analysis completed", capitalized(kind)));
    Ok(())
}

fn capitalized(kind: TeamKind) -> String {
    let name = kind.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized() {
        assert_eq!(capitalized(TeamKind::Finance), "Finance");
        assert_eq!(capitalized(TeamKind::Legal), "Legal");
    }
}
