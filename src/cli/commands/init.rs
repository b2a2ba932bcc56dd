//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Samtale Setup");
    println!();
    println!("Welcome to Samtale! Let's make sure everything is configured correctly.\n");

    // Step 1: Check credentials
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    let mut missing = Vec::new();
    for (var, purpose) in [
        ("OPENAI_API_KEY", "LLM analysis, embeddings, and Whisper"),
        ("ASSEMBLYAI_API_KEY", "realtime voice transcription"),
        ("QDRANT_URL", "the vector store (defaults to http://localhost:6333)"),
    ] {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                Output::success(&format!("{} is configured", var));
            }
            _ => {
                Output::warning(&format!("{} is not set ({})", var, purpose));
                missing.push(var);
            }
        }
    }

    if !missing.is_empty() {
        println!();
        println!("  Set missing variables in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        for var in &missing {
            println!("  {}", style(format!("export {}='...'", var)).green());
        }
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Set the missing variables and run 'samtale init' again.");
            return Ok(());
        }
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("samtale config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("samtale doctor").cyan());
    println!(
        "  {} Ingest a document",
        style("samtale inject --file <path>").cyan()
    );
    println!(
        "  {} Ask the finance team a question",
        style("samtale finance \"<question>\"").cyan()
    );
    println!(
        "  {} Talk to a team hands-free",
        style("samtale converse --team finance").cyan()
    );
    println!();
    println!("For more help: {}", style("samtale --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
