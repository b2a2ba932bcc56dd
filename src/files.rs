//! File save and folder read helpers.

use crate::error::{Result, SamtaleError};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Save text under `output_dir`, creating the directory if needed.
///
/// Without a filename, a timestamp-based name is generated. A `.txt`
/// extension is appended when missing. Returns the written path.
pub fn save_text_to_file(
    text: &str,
    filename: Option<&str>,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let filename = match filename {
        Some(name) if name.ends_with(".txt") => name.to_string(),
        Some(name) => format!("{}.txt", name),
        None => format!("{}.txt", Local::now().format("%Y%m%d_%H%M%S")),
    };

    let file_path = output_dir.join(filename);
    std::fs::write(&file_path, text)?;
    Ok(file_path)
}

/// Read every regular file in a folder and return the concatenated content.
///
/// Unreadable files are skipped with a warning. A missing folder is an
/// error; entries are read in name order so the result is deterministic.
pub fn read_folder_text(folder: &Path) -> Result<String> {
    if !folder.is_dir() {
        return Err(SamtaleError::InvalidInput(format!(
            "Directory '{}' not found",
            folder.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut combined = String::new();
    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                combined.push_str(&content);
                combined.push('\n');
            }
            Err(e) => warn!("Could not read file {}: {}", path.display(), e),
        }
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_appends_txt_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_text_to_file("hello", Some("notes"), dir.path()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        let path = save_text_to_file("hello", Some("notes.txt"), dir.path()).unwrap();
        assert!(path.ends_with("notes.txt"));
    }

    #[test]
    fn test_save_generates_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_text_to_file("hello", None, dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_folder_concatenates_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();

        let combined = read_folder_text(dir.path()).unwrap();
        assert_eq!(combined, "first\nsecond\n");
    }

    #[test]
    fn test_read_missing_folder_is_error() {
        let err = read_folder_text(Path::new("/does/not/exist")).unwrap_err();
        assert!(matches!(err, SamtaleError::InvalidInput(_)));
    }
}
