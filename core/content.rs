use crate::error::{AppError, Result};
use crate::rules::{dotted_extension, language::language_for_extension};
use log;
use std::fs;
use std::path::Path;

pub const SELECTED_FILE_SUFFIX: &str = " ⭐ (Selected file)";

/// Renders one file as a Markdown section: a path heading followed by a
/// fenced block. Never fails; read errors become an inline marker.
#[derive(Debug, Clone, Copy)]
pub struct ContentRenderer {
    max_chars: usize,
}

impl ContentRenderer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn render(&self, file_path: &Path, relative_path: &str, is_selected: bool) -> String {
        let mut block = String::new();
        block.push_str(&format!("\n### `{}`", relative_path));
        if is_selected {
            block.push_str(SELECTED_FILE_SUFFIX);
        }
        block.push('\n');

        match read_text(file_path) {
            Ok(content) => {
                let language = dotted_extension(file_path)
                    .and_then(|ext| language_for_extension(&ext))
                    .unwrap_or("");
                let body = truncate(&content, self.max_chars);
                block.push_str(&format!("```{}\n{}\n```\n", language, body));
            }
            Err(e) => {
                log::warn!("{}", e);
                block.push_str(&format!("```\n❌ Error reading file: {}\n```\n", reason(&e)));
            }
        }
        block
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    String::from_utf8(bytes).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn reason(err: &AppError) -> String {
    match err {
        AppError::FileRead { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

/// Keeps the first `max_chars` characters and appends a marker carrying the
/// full character count of `content`.
pub fn truncate(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }
    let cut = content
        .char_indices()
        .nth(max_chars)
        .map_or(content.len(), |(idx, _)| idx);
    format!(
        "{}\n\n// ... (content truncated, {} total characters)",
        &content[..cut],
        total
    )
}
