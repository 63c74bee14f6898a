use crate::error::{AppError, Result};
use log;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WholeProject,
    SingleFile,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WholeProject => write!(f, "Complete project"),
            Mode::SingleFile => write!(f, "Single file"),
        }
    }
}

/// What a generation request points at. Paths are canonical so that walked
/// entries compare equal to the selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRoot {
    base_path: PathBuf,
    selected_file: Option<PathBuf>,
}

impl SelectionRoot {
    /// Resolves `path` into a selection.
    ///
    /// A regular file always selects single-file mode with its parent as the
    /// base. `single_file` on anything other than a regular file is rejected,
    /// as is a path that does not exist.
    pub fn new(path: &Path, single_file: bool) -> Result<Self> {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());

        if expanded.is_file() {
            // Anchor on the directory holding the entry itself, so a symlinked
            // file keeps its own name and neighbours.
            let file_name = expanded
                .file_name()
                .ok_or_else(|| AppError::invalid_root(&expanded, "has no file name"))?;
            let parent = expanded
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let base_path = parent.canonicalize().map_err(|e| {
                AppError::invalid_root(parent, format!("cannot be resolved: {}", e))
            })?;
            let selected = base_path.join(file_name);
            log::debug!(
                "Single file selection: {} (base {})",
                selected.display(),
                base_path.display()
            );
            return Ok(Self {
                base_path,
                selected_file: Some(selected),
            });
        }

        let canonical = expanded
            .canonicalize()
            .map_err(|e| AppError::invalid_root(&expanded, format!("cannot be resolved: {}", e)))?;

        if single_file {
            return Err(AppError::invalid_root(
                &canonical,
                "is not a regular file but single file mode was requested",
            ));
        }
        if !canonical.is_dir() {
            return Err(AppError::invalid_root(
                &canonical,
                "is neither a file nor a directory",
            ));
        }

        log::debug!("Project selection: {}", canonical.display());
        Ok(Self {
            base_path: canonical,
            selected_file: None,
        })
    }

    pub fn mode(&self) -> Mode {
        if self.selected_file.is_some() {
            Mode::SingleFile
        } else {
            Mode::WholeProject
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected_file.as_deref() == Some(path)
    }

    pub fn project_name(&self) -> String {
        display_name(&self.base_path)
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.selected_file.as_deref().map(display_name)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_directory_selects_whole_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = SelectionRoot::new(dir.path(), false).unwrap();
        assert_eq!(root.mode(), Mode::WholeProject);
        assert_eq!(root.base_path(), dir.path().canonicalize().unwrap());
        assert!(root.selected_file().is_none());
    }

    #[test]
    fn test_file_path_selects_single_file_even_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.py");
        fs::write(&file, "print()").unwrap();

        let root = SelectionRoot::new(&file, false).unwrap();
        assert_eq!(root.mode(), Mode::SingleFile);
        assert_eq!(root.base_path(), dir.path().canonicalize().unwrap());
        assert_eq!(root.selected_file_name().as_deref(), Some("main.py"));
        assert!(root.is_selected(&file.canonicalize().unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_keeps_link_directory_as_base() {
        let project = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let real = elsewhere.path().join("real.py");
        fs::write(&real, "pass").unwrap();
        let link = project.path().join("link.py");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let root = SelectionRoot::new(&link, false).unwrap();
        let base = project.path().canonicalize().unwrap();
        assert_eq!(root.mode(), Mode::SingleFile);
        assert_eq!(root.base_path(), base);
        assert_eq!(root.selected_file_name().as_deref(), Some("link.py"));
        assert!(root.is_selected(&base.join("link.py")));
    }

    #[test]
    fn test_single_file_flag_on_directory_is_invalid_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = SelectionRoot::new(dir.path(), true);
        assert!(matches!(result, Err(AppError::InvalidRoot { .. })));
    }

    #[test]
    fn test_missing_path_is_invalid_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = SelectionRoot::new(&dir.path().join("missing"), false);
        assert!(matches!(result, Err(AppError::InvalidRoot { .. })));
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::WholeProject.to_string(), "Complete project");
        assert_eq!(Mode::SingleFile.to_string(), "Single file");
    }
}
