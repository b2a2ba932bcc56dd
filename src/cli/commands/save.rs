//! Save command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::files::{read_folder_text, save_text_to_file};
use anyhow::Result;
use std::path::Path;

/// Run the save command: write text or file/folder contents to the output
/// directory.
pub fn run_save(
    text: Option<String>,
    file: Option<String>,
    folder: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let output_dir = settings.output_dir();

    let content = if let Some(text) = text {
        text
    } else if let Some(file) = file {
        let path = Path::new(&file);
        if !path.is_file() {
            Output::error(&format!("File not found: {}", file));
            anyhow::bail!("File not found: {}", file);
        }
        std::fs::read_to_string(path)?
    } else if let Some(folder) = folder {
        let content = read_folder_text(Path::new(&folder))?;
        if content.trim().is_empty() {
            Output::warning("No content found in folder");
            return Ok(());
        }
        content
    } else {
        Output::error("Please provide --text, --file, or --folder");
        anyhow::bail!("No save input given");
    };

    let path = save_text_to_file(&content, output.as_deref(), &output_dir)?;
    Output::success(&format!("Saved to {}", path.display()));

    Ok(())
}
