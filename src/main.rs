//! Samtale CLI entry point.

use anyhow::Result;
use clap::Parser;
use samtale::agent::TeamKind;
use samtale::cli::{commands, Cli, Commands};
use samtale::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("samtale={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings).await?;
        }

        Commands::Finance { query, user, model, output } => {
            commands::run_analyze(
                TeamKind::Finance,
                query,
                user,
                model.clone(),
                output.clone(),
                settings,
            )
            .await?;
        }

        Commands::Medical { query, user, model, output } => {
            commands::run_analyze(
                TeamKind::Medical,
                query,
                user,
                model.clone(),
                output.clone(),
                settings,
            )
            .await?;
        }

        Commands::Legal { query, user, model, output } => {
            commands::run_analyze(
                TeamKind::Legal,
                query,
                user,
                model.clone(),
                output.clone(),
                settings,
            )
            .await?;
        }

        Commands::Converse { team, user } => {
            commands::run_converse(team, user, settings).await?;
        }

        Commands::Stream => {
            commands::run_stream(settings).await?;
        }

        Commands::Transcribe { source, output, inject, name } => {
            commands::run_transcribe(source, output.clone(), *inject, name.clone(), settings)
                .await?;
        }

        Commands::Inject { text, file, folder, collection, name } => {
            commands::run_inject(
                text.clone(),
                file.clone(),
                folder.clone(),
                collection.clone(),
                name.clone(),
                settings,
            )
            .await?;
        }

        Commands::Search { query, collection, limit } => {
            commands::run_search(query, collection.clone(), *limit, settings).await?;
        }

        Commands::Context { query, collection, limit } => {
            commands::run_context(query, collection.clone(), *limit, settings).await?;
        }

        Commands::Clear { collection } => {
            commands::run_clear(collection.clone(), settings).await?;
        }

        Commands::Memory { action } => {
            commands::run_memory(action, settings)?;
        }

        Commands::Save { text, file, folder, output } => {
            commands::run_save(
                text.clone(),
                file.clone(),
                folder.clone(),
                output.clone(),
                settings,
            )?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
