//! Prompt templates for the analysis teams.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub finance: TeamPrompt,
    pub medical: TeamPrompt,
    pub legal: TeamPrompt,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// System prompt and optional user-facing disclaimer for one team.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TeamPrompt {
    pub system: String,
    pub disclaimer: Option<String>,
}

impl Prompts {
    /// Built-in defaults for all three teams.
    pub fn builtin() -> Self {
        Self {
            finance: TeamPrompt {
                system: r#"You are the coordinator of a financial analysis team with three perspectives: web research (both positive and negative findings about a topic), personal knowledge retrieved from the user's document base, and market data analysis.

Guidelines:
- Use 'search_knowledge' to pull relevant material from the user's documents before answering
- Use 'recall_memory' to check earlier conversations for the user's goals and constraints
- Weigh positive and negative information about a topic; be unbiased and favor the user's long-term goals
- Consider both fundamental analysis and market sentiment
- Use tables to display prices, fundamentals (P/E, Market Cap), and recommendations
- Clearly state company names and ticker symbols
- Present findings in a structured, easy-to-follow format
- Only output the final consolidated analysis, not intermediate reasoning steps"#
                    .to_string(),
                disclaimer: None,
            },
            medical: TeamPrompt {
                system: r#"You are the coordinator of a medical analysis team covering clinical diagnostic reasoning, medical research, pharmacology, and patient safety.

Guidelines:
- Use 'search_knowledge' to pull relevant material from the user's documents before answering
- Use 'recall_memory' to check earlier conversations for relevant patient context
- Walk through differential considerations before conclusions
- Note drug interactions, contraindications, and safety concerns explicitly
- Cite the knowledge base sources you relied on
- State clearly when a question needs a qualified healthcare professional
- Present findings in a structured, easy-to-follow format"#
                    .to_string(),
                disclaimer: Some(
                    "Medical information is for educational purposes only. Always consult \
                     with healthcare professionals for medical advice."
                        .to_string(),
                ),
            },
            legal: TeamPrompt {
                system: r#"You are the coordinator of a legal analysis team covering legal research, contract analysis, regulatory compliance, and risk assessment.

Guidelines:
- Use 'search_knowledge' to pull relevant material from the user's documents before answering
- Use 'recall_memory' to check earlier conversations for matter context
- Identify the governing jurisdiction and applicable frameworks where possible
- Separate settled rules from open questions and flag risk levels
- Cite the knowledge base sources you relied on
- State clearly when a question needs qualified legal counsel
- Present findings in a structured, easy-to-follow format"#
                    .to_string(),
                disclaimer: Some(
                    "Legal information is for educational purposes only - not legal advice. \
                     No attorney-client relationship is created. Always consult qualified \
                     legal counsel."
                        .to_string(),
                ),
            },
            variables: std::collections::HashMap::new(),
        }
    }

    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::builtin();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let teams_path = custom_path.join("teams.toml");
            if teams_path.exists() {
                let content = std::fs::read_to_string(&teams_path)?;
                let custom: Prompts = toml::from_str(&content)?;
                if !custom.finance.system.is_empty() {
                    prompts.finance = custom.finance;
                }
                if !custom.medical.system.is_empty() {
                    prompts.medical = custom.medical;
                }
                if !custom.legal.system.is_empty() {
                    prompts.legal = custom.legal;
                }
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template with both provided and custom config variables.
    /// Provided variables take precedence.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prompts() {
        let prompts = Prompts::builtin();
        assert!(!prompts.finance.system.is_empty());
        assert!(prompts.finance.disclaimer.is_none());
        assert!(prompts.medical.disclaimer.is_some());
        assert!(prompts.legal.disclaimer.is_some());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }
}
