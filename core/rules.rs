use crate::error::{AppError, Result};
use log;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub mod language;

/// Immutable inclusion policy.
///
/// `excluded_files` mixes exact basenames and dotted extensions in a single
/// set, so a rule such as `.env` matches both a file named `.env` and any file
/// whose extension is `.env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    excluded_dirs: BTreeSet<String>,
    excluded_files: BTreeSet<String>,
    allowed_extensions: BTreeSet<String>,
    max_chars: usize,
}

impl RuleSet {
    pub fn new<D, F, E>(excluded_dirs: D, excluded_files: F, allowed_extensions: E, max_chars: usize) -> Self
    where
        D: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            excluded_dirs: excluded_dirs.into_iter().collect(),
            excluded_files: excluded_files.into_iter().collect(),
            allowed_extensions: allowed_extensions.into_iter().collect(),
            max_chars,
        }
    }

    pub fn excluded_dirs(&self) -> &BTreeSet<String> {
        &self.excluded_dirs
    }

    pub fn excluded_files(&self) -> &BTreeSet<String> {
        &self.excluded_files
    }

    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// True when either the basename or the dotted extension is listed.
    pub fn is_excluded_file(&self, name: &str, extension: Option<&str>) -> bool {
        self.excluded_files.contains(name)
            || extension.is_some_and(|ext| self.excluded_files.contains(ext))
    }

    pub fn is_allowed_extension(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| self.allowed_extensions.contains(ext))
    }
}

/// Returns the extension of `path` with its leading dot (`"src/a.py"` -> `".py"`).
/// Dotfiles such as `.gitignore` have no extension.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Substring patterns read from the project ignore file.
///
/// A path is ignored when any pattern occurs anywhere in its relative path.
/// Glob and negation syntax are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// Loads `<base>/<file_name>`. A missing file yields no rules; an
    /// unreadable one is logged and also yields no rules.
    pub fn load(base: &Path, file_name: &str) -> Self {
        let path = base.join(file_name);
        if !path.is_file() {
            log::debug!("No ignore file at {}", path.display());
            return Self::default();
        }
        match read_ignore_file(&path) {
            Ok(rules) => {
                log::debug!(
                    "Loaded {} ignore patterns from {}",
                    rules.patterns.len(),
                    path.display()
                );
                rules
            }
            Err(e) => {
                log::warn!("Ignoring unreadable ignore file: {}", e);
                Self::default()
            }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| relative_path.contains(pattern.as_str()))
    }
}

fn read_ignore_file(path: &Path) -> Result<IgnoreRules> {
    let content = fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(IgnoreRules::parse(&content))
}
