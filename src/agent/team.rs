//! Analysis team construction.
//!
//! A team is an [`Agent`] configured with a team-specific system prompt and
//! the knowledge/memory tools, plus the user-facing disclaimer some domains
//! require.

use super::runner::{Agent, AgentResponse};
use super::tools::ToolContext;
use crate::config::{Prompts, Settings};
use crate::error::{Result, SamtaleError};
use crate::memory::ConversationMemory;
use crate::rag::{KnowledgeClient, NO_CONTEXT};
use std::sync::Arc;
use tracing::{info, warn};

/// The available analysis teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamKind {
    Finance,
    Medical,
    Legal,
}

impl TeamKind {
    /// All known teams with a short description each.
    pub fn catalog() -> &'static [(TeamKind, &'static str)] {
        &[
            (
                TeamKind::Finance,
                "Financial Analysis Team - market data, investment analysis, financial planning",
            ),
            (
                TeamKind::Medical,
                "Medical Analysis Team - clinical diagnostics, research, pharmacology, safety",
            ),
            (
                TeamKind::Legal,
                "Legal Analysis Team - legal research, contract analysis, compliance, risk",
            ),
        ]
    }
}

impl std::str::FromStr for TeamKind {
    type Err = SamtaleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "finance" => Ok(TeamKind::Finance),
            "medical" => Ok(TeamKind::Medical),
            "legal" => Ok(TeamKind::Legal),
            other => Err(SamtaleError::InvalidInput(format!(
                "Unknown team type: {}. Available teams: finance, medical, legal",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TeamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamKind::Finance => write!(f, "finance"),
            TeamKind::Medical => write!(f, "medical"),
            TeamKind::Legal => write!(f, "legal"),
        }
    }
}

/// An analysis team bound to one user.
pub struct AnalysisTeam {
    kind: TeamKind,
    agent: Agent,
    knowledge: Arc<KnowledgeClient>,
    memory: Option<Arc<ConversationMemory>>,
    collection: String,
    user: String,
    max_context_documents: usize,
    disclaimer: Option<String>,
}

impl AnalysisTeam {
    /// Build a team from settings and prompts.
    pub fn build(
        kind: TeamKind,
        settings: &Settings,
        prompts: &Prompts,
        knowledge: Arc<KnowledgeClient>,
        memory: Option<Arc<ConversationMemory>>,
        user: &str,
        model: Option<String>,
    ) -> Self {
        let prompt = match kind {
            TeamKind::Finance => &prompts.finance,
            TeamKind::Medical => &prompts.medical,
            TeamKind::Legal => &prompts.legal,
        };

        let collection = settings.vector_store.collection.clone();
        let tools = ToolContext::new(knowledge.clone(), memory.clone(), &collection, user);

        let model = model.unwrap_or_else(|| settings.team.model.clone());
        let agent = Agent::new(tools, &model, &prompt.system)
            .with_max_iterations(settings.team.max_iterations);

        Self {
            kind,
            agent,
            knowledge,
            memory,
            collection,
            user: user.to_string(),
            max_context_documents: settings.team.max_context_documents,
            disclaimer: prompt.disclaimer.clone(),
        }
    }

    /// Which team this is.
    pub fn kind(&self) -> TeamKind {
        self.kind
    }

    /// The user this team is bound to.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Domain disclaimer to show the user, if any.
    pub fn disclaimer(&self) -> Option<&str> {
        self.disclaimer.as_deref()
    }

    /// Run one analysis: fetch knowledge context, run the agent, and record
    /// both sides of the exchange in memory.
    pub async fn analyze(&self, query: &str) -> Result<AgentResponse> {
        info!("Running {} analysis for user '{}'", self.kind, self.user);

        // A failed retrieval must not abort the run; the agent can still
        // search explicitly through its tools.
        let context = match self
            .knowledge
            .context_for_query(query, &self.collection, self.max_context_documents)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!("Knowledge retrieval failed, continuing without: {}", e);
                NO_CONTEXT.to_string()
            }
        };

        let context = if context == NO_CONTEXT {
            None
        } else {
            Some(context)
        };

        let response = self.agent.run(query, context.as_deref()).await?;

        if let Some(memory) = &self.memory {
            if let Err(e) = memory.record(&self.user, "user", query) {
                warn!("Failed to record user turn: {}", e);
            }
            if let Err(e) = memory.record(&self.user, "assistant", &response.content) {
                warn!("Failed to record assistant turn: {}", e);
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_kind_round_trip() {
        for (kind, _) in TeamKind::catalog() {
            let parsed: TeamKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn test_unknown_team_is_invalid_input() {
        let err = "astrology".parse::<TeamKind>().unwrap_err();
        assert!(matches!(err, SamtaleError::InvalidInput(_)));
    }
}
