//! Round-trips text through the user's editor.

use std::io::{self, Write};
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to prepare temp file: {0}")]
    TempFile(#[source] io::Error),

    #[error("Failed to launch editor '{0}': {1}")]
    Launch(String, #[source] io::Error),

    #[error("Editor '{0}' exited with {1}")]
    Failed(String, std::process::ExitStatus),
}

/// `$VISUAL`, then `$EDITOR`, then `vim`.
pub fn editor_command() -> String {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vim".to_string())
}

/// Opens `content` in the user's editor and returns the saved text.
pub fn edit(content: &str) -> Result<String, EditorError> {
    edit_with(&editor_command(), content)
}

/// Like [`edit`] with an explicit editor command line, e.g. `code -w`.
pub fn edit_with(editor: &str, content: &str) -> Result<String, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("endure-")
        .suffix(".txt")
        .tempfile()
        .map_err(EditorError::TempFile)?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.flush())
        .map_err(EditorError::TempFile)?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vim");
    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .map_err(|e| EditorError::Launch(editor.to_string(), e))?;

    if !status.success() {
        return Err(EditorError::Failed(editor.to_string(), status));
    }

    // The editor may have replaced the file rather than writing through our handle.
    std::fs::read_to_string(file.path()).map_err(EditorError::TempFile)
}
