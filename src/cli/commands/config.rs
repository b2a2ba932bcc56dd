//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let mut settings = settings;
            apply_set(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!(
                "Saved to {}",
                Settings::default_config_path().display()
            ));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply one `key = value` assignment to the settings.
fn apply_set(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.output_dir" => settings.general.output_dir = value.to_string(),
        "embedding.model" => settings.embedding.model = value.to_string(),
        "embedding.dimensions" => settings.embedding.dimensions = value.parse()?,
        "vector_store.provider" => settings.vector_store.provider = value.to_string(),
        "vector_store.url" => settings.vector_store.url = value.to_string(),
        "vector_store.collection" => settings.vector_store.collection = value.to_string(),
        "transcription.model" => settings.transcription.model = value.to_string(),
        "streaming.endpoint" => settings.streaming.endpoint = value.to_string(),
        "streaming.sample_rate" => settings.streaming.sample_rate = value.parse()?,
        "streaming.format_turns" => settings.streaming.format_turns = value.parse()?,
        "streaming.pause_duration_seconds" => {
            settings.streaming.pause_duration_seconds = value.parse()?
        }
        "team.model" => settings.team.model = value.to_string(),
        "team.max_iterations" => settings.team.max_iterations = value.parse()?,
        "team.max_context_documents" => settings.team.max_context_documents = value.parse()?,
        other => anyhow::bail!(
            "Unknown configuration key: {}. Run 'samtale config show' to see available keys.",
            other
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_set_string_key() {
        let mut settings = Settings::default();
        apply_set(&mut settings, "team.model", "gpt-4o-mini").unwrap();
        assert_eq!(settings.team.model, "gpt-4o-mini");
    }

    #[test]
    fn test_apply_set_parses_numbers() {
        let mut settings = Settings::default();
        apply_set(&mut settings, "streaming.pause_duration_seconds", "1.5").unwrap();
        assert_eq!(settings.streaming.pause_duration_seconds, 1.5);

        assert!(apply_set(&mut settings, "embedding.dimensions", "not-a-number").is_err());
    }

    #[test]
    fn test_apply_set_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(apply_set(&mut settings, "nope.nothing", "x").is_err());
    }
}
