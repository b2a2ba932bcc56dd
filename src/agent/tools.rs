//! Tool definitions and implementations for the agent system.

use crate::error::{Result, SamtaleError};
use crate::memory::ConversationMemory;
use crate::rag::KnowledgeClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search the knowledge base.
    SearchKnowledge {
        query: String,
        #[serde(default = "default_limit")]
        limit: u32,
    },

    /// Recall past conversation turns for the current user.
    RecallMemory {
        query: String,
        #[serde(default = "default_limit")]
        limit: u32,
    },
}

fn default_limit() -> u32 {
    5
}

/// Tool execution context.
pub struct ToolContext {
    pub knowledge: Arc<KnowledgeClient>,
    pub memory: Option<Arc<ConversationMemory>>,
    /// Collection searched by `search_knowledge`.
    pub collection: String,
    /// User whose memories `recall_memory` reads.
    pub user: String,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(
        knowledge: Arc<KnowledgeClient>,
        memory: Option<Arc<ConversationMemory>>,
        collection: &str,
        user: &str,
    ) -> Self {
        Self {
            knowledge,
            memory,
            collection: collection.to_string(),
            user: user.to_string(),
        }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::SearchKnowledge { query, limit } => {
                self.execute_search_knowledge(query, *limit).await
            }
            ToolCall::RecallMemory { query, limit } => self.execute_recall_memory(query, *limit),
        }
    }

    async fn execute_search_knowledge(&self, query: &str, limit: u32) -> Result<String> {
        let results = self
            .knowledge
            .retrieve(query, &self.collection, limit as usize)
            .await?;

        if results.is_empty() {
            return Ok("No relevant results found.".to_string());
        }

        let formatted = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. {} (score: {:.3})\n   {}",
                    i + 1,
                    r.source(),
                    r.score,
                    r.text.chars().take(500).collect::<String>()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!("Found {} results:\n\n{}", results.len(), formatted))
    }

    fn execute_recall_memory(&self, query: &str, limit: u32) -> Result<String> {
        let Some(memory) = &self.memory else {
            return Ok("Conversation memory is not available.".to_string());
        };

        let entries = memory.recall(&self.user, query, limit as usize)?;

        if entries.is_empty() {
            return Ok("No stored memories match.".to_string());
        }

        let formatted = entries
            .iter()
            .map(|entry| {
                format!(
                    "[{}] {}: {}",
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.role,
                    entry.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(formatted)
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "search_knowledge".to_string(),
                description: Some(
                    "Search the user's knowledge base for relevant documents. \
                    Use this to ground your analysis in the user's own material."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of results (default: 5)",
                            "default": 5
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "recall_memory".to_string(),
                description: Some(
                    "Recall past conversation turns with this user. \
                    Use this to pick up goals or context from earlier sessions."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Text to look for in stored memories"
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of memories (default: 5)",
                            "default": 5
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SamtaleError::Agent(format!("Invalid tool arguments: {}", e)))?;

    let query = |args: &serde_json::Value| -> Result<String> {
        args["query"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SamtaleError::Agent("Missing 'query' argument".to_string()))
    };

    match name {
        "search_knowledge" => Ok(ToolCall::SearchKnowledge {
            query: query(&args)?,
            limit: args["limit"].as_u64().unwrap_or(5) as u32,
        }),
        "recall_memory" => Ok(ToolCall::RecallMemory {
            query: query(&args)?,
            limit: args["limit"].as_u64().unwrap_or(5) as u32,
        }),
        _ => Err(SamtaleError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_knowledge_tool() {
        let tool =
            parse_tool_call("search_knowledge", r#"{"query": "nvidia", "limit": 10}"#).unwrap();
        match tool {
            ToolCall::SearchKnowledge { query, limit } => {
                assert_eq!(query, "nvidia");
                assert_eq!(limit, 10);
            }
            _ => panic!("Expected SearchKnowledge tool"),
        }
    }

    #[test]
    fn test_parse_recall_memory_defaults_limit() {
        let tool = parse_tool_call("recall_memory", r#"{"query": "portfolio"}"#).unwrap();
        match tool {
            ToolCall::RecallMemory { query, limit } => {
                assert_eq!(query, "portfolio");
                assert_eq!(limit, 5);
            }
            _ => panic!("Expected RecallMemory tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool_is_error() {
        assert!(parse_tool_call("launch_rockets", "{}").is_err());
    }
}
