//! Per-user conversation memory.
//!
//! Stores conversation turns in SQLite so analysis teams can recall what a
//! user said and was told in earlier sessions.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// One remembered conversation turn.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// Who produced the content: "user" or "assistant".
    pub role: String,
    /// The remembered text.
    pub content: String,
    /// When the turn was recorded.
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed conversation memory.
pub struct ConversationMemory {
    conn: Mutex<Connection>,
}

impl ConversationMemory {
    /// Open (or create) the memory database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS memories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_memories_user ON memories(user)",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record one conversation turn for a user.
    pub fn record(&self, user: &str, role: &str, content: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO memories (user, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user, role, content, Utc::now().to_rfc3339()],
        )?;
        debug!("Recorded {} memory for user '{}'", role, user);
        Ok(())
    }

    /// Recall turns matching `query` for a user, most recent first.
    pub fn recall(&self, user: &str, query: &str, limit: usize) -> Result<Vec<MemoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            "SELECT role, content, created_at FROM memories
             WHERE user = ?1 AND content LIKE ?2
             ORDER BY id DESC LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![user, pattern, limit as i64], row_to_entry)?;
        collect_entries(rows)
    }

    /// List the most recent turns for a user.
    pub fn list(&self, user: &str, limit: usize) -> Result<Vec<MemoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT role, content, created_at FROM memories
             WHERE user = ?1 ORDER BY id DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user, limit as i64], row_to_entry)?;
        collect_entries(rows)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemoryEntry> {
    let created_at: String = row.get(2)?;
    Ok(MemoryEntry {
        role: row.get(0)?,
        content: row.get(1)?,
        created_at: created_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn collect_entries(
    rows: impl Iterator<Item = rusqlite::Result<MemoryEntry>>,
) -> Result<Vec<MemoryEntry>> {
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_list_most_recent_first() {
        let memory = ConversationMemory::open_in_memory().unwrap();
        memory.record("alice", "user", "first question").unwrap();
        memory.record("alice", "assistant", "first answer").unwrap();

        let entries = memory.list("alice", 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "first answer");
        assert_eq!(entries[1].content, "first question");
    }

    #[test]
    fn test_recall_filters_by_user_and_query() {
        let memory = ConversationMemory::open_in_memory().unwrap();
        memory.record("alice", "user", "tell me about nvidia").unwrap();
        memory.record("alice", "user", "tell me about weather").unwrap();
        memory.record("bob", "user", "nvidia earnings").unwrap();

        let entries = memory.recall("alice", "nvidia", 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "tell me about nvidia");
    }

    #[test]
    fn test_recall_limit() {
        let memory = ConversationMemory::open_in_memory().unwrap();
        for i in 0..5 {
            memory.record("alice", "user", &format!("note {}", i)).unwrap();
        }

        let entries = memory.recall("alice", "note", 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "note 4");
    }
}
