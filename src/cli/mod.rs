//! CLI module for Samtale.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Samtale - Voice-Driven Analysis Teams
///
/// A CLI tool that pairs a retrieval-augmented knowledge base with realtime
/// voice transcription and LLM analysis teams.
/// The name "Samtale" comes from the Norwegian word for "conversation."
#[derive(Parser, Debug)]
#[command(name = "samtale")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Samtale and write the default configuration
    Init,

    /// Check credentials and configuration
    Doctor,

    /// Run financial analysis with the finance team
    Finance {
        /// Financial analysis query
        query: String,

        /// User identifier for memory storage
        #[arg(short, long, default_value = "user")]
        user: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Save the analysis to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run medical analysis with the medical team
    Medical {
        /// Medical analysis query
        query: String,

        /// User identifier for memory storage
        #[arg(short, long, default_value = "medical_user")]
        user: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Save the analysis to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run legal analysis with the legal team
    Legal {
        /// Legal analysis query
        query: String,

        /// User identifier for memory storage
        #[arg(short, long, default_value = "legal_user")]
        user: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Save the analysis to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start a voice conversation with an analysis team
    Converse {
        /// Agent team to use: finance, medical, or legal
        #[arg(short, long, default_value = "finance")]
        team: String,

        /// User identifier for memory storage
        #[arg(short, long, default_value = "user")]
        user: String,
    },

    /// Stream live transcription from the microphone
    Stream,

    /// Transcribe a local audio file
    Transcribe {
        /// Path to the audio file
        source: String,

        /// Save the transcript to a file
        #[arg(short, long)]
        output: Option<String>,

        /// Inject the transcript into the knowledge base
        #[arg(long)]
        inject: bool,

        /// Name for the knowledge base entry
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Ingest text, a file, or a folder into the knowledge base
    Inject {
        /// Text to ingest
        #[arg(long)]
        text: Option<String>,

        /// File to ingest
        #[arg(long)]
        file: Option<String>,

        /// Folder whose files to ingest
        #[arg(long)]
        folder: Option<String>,

        /// Target collection (default from config)
        #[arg(short, long)]
        collection: Option<String>,

        /// Name for the entry (text ingestion)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Search the knowledge base
    Search {
        /// Search query
        query: String,

        /// Collection to search (default from config)
        #[arg(short, long)]
        collection: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Show the formatted context block for a query
    Context {
        /// Query to build context for
        query: String,

        /// Collection to search (default from config)
        #[arg(short, long)]
        collection: Option<String>,

        /// Maximum number of documents
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Delete a whole collection
    Clear {
        /// Collection to delete (default from config)
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// Query or list stored conversation memories
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Save text or file/folder contents to the output directory
    Save {
        /// Text to save
        #[arg(long)]
        text: Option<String>,

        /// File whose contents to save
        #[arg(long)]
        file: Option<String>,

        /// Folder whose combined contents to save
        #[arg(long)]
        folder: Option<String>,

        /// Output file name
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemoryAction {
    /// Search stored memories
    Query {
        /// Memory query
        query: String,

        /// User identifier
        #[arg(short, long, default_value = "user")]
        user: String,

        /// Maximum number of memories
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List recent memories
    List {
        /// User identifier
        #[arg(short, long, default_value = "user")]
        user: String,

        /// Maximum number of memories
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "team.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
