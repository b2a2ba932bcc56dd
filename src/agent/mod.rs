//! Agent system for the analysis teams.
//!
//! Provides an LLM agent with tool calling over the knowledge base and the
//! conversation memory, plus the finance/medical/legal team configurations
//! built on top of it.

mod runner;
mod team;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use team::{AnalysisTeam, TeamKind};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
