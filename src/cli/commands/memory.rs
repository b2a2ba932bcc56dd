//! Memory command implementation.

use crate::cli::{MemoryAction, Output};
use crate::config::Settings;
use crate::memory::{ConversationMemory, MemoryEntry};
use anyhow::Result;

/// Run the memory command: query or list stored conversation memories.
pub fn run_memory(action: &MemoryAction, settings: Settings) -> Result<()> {
    let memory = ConversationMemory::open(&settings.memory_db_path())?;

    match action {
        MemoryAction::Query { query, user, limit } => {
            Output::info(&format!("Querying memories: {}", query));
            let entries = memory.recall(user, query, *limit)?;
            print_entries(&entries);
        }
        MemoryAction::List { user, limit } => {
            Output::info(&format!("Listing memories for user '{}'", user));
            let entries = memory.list(user, *limit)?;
            print_entries(&entries);
        }
    }

    Ok(())
}

fn print_entries(entries: &[MemoryEntry]) {
    if entries.is_empty() {
        Output::warning("No stored memories found.");
        return;
    }

    for entry in entries {
        Output::list_item(&format!(
            "[{}] {}: {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.role,
            entry.content
        ));
    }
}
