//! Voice conversation command implementation.

use crate::agent::{AnalysisTeam, TeamKind};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::conversation::ConversationHandler;
use crate::memory::ConversationMemory;
use crate::rag::KnowledgeClient;
use anyhow::Result;
use std::sync::Arc;

/// Run the voice conversation loop with the chosen team.
pub async fn run_converse(team: &str, user: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Converse) {
        Output::error(&format!("{}", e));
        Output::info("Run 'samtale doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let kind: TeamKind = match team.parse() {
        Ok(kind) => kind,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::header("Available teams");
            for (kind, description) in TeamKind::catalog() {
                Output::list_item(&format!("{}: {}", kind, description));
            }
            return Err(e.into());
        }
    };

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

    let analysis_team =
        AnalysisTeam::build(kind, &settings, &prompts, knowledge, memory, user, None);

    let mut handler = ConversationHandler::new(analysis_team, settings);
    handler.run().await?;

    Ok(())
}
