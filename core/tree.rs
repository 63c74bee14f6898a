use crate::classify::{EntryKind, PathClassifier};
use crate::error::AppError;
use crate::selection::SelectionRoot;
use log;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const INDENT: &str = "    ";
pub const ACCESS_DENIED: &str = "[Access denied]";

/// Depth-first textual tree of the selection's base directory.
///
/// Children are listed directories first, then files, each group ordered by
/// lowercase name. Entries at `max_depth` are listed but never descended into.
pub struct TreeRenderer<'a> {
    classifier: PathClassifier<'a>,
    root: &'a SelectionRoot,
    max_depth: usize,
}

struct Child {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(classifier: PathClassifier<'a>, root: &'a SelectionRoot, max_depth: usize) -> Self {
        Self {
            classifier,
            root,
            max_depth,
        }
    }

    pub fn render(&self) -> Vec<String> {
        log::debug!(
            "Rendering structure of {} (max depth {})",
            self.root.base_path().display(),
            self.max_depth
        );
        let mut lines = Vec::new();
        self.render_level(self.root.base_path(), 1, &mut lines);
        log::debug!("Structure rendered: {} lines", lines.len());
        lines
    }

    fn render_level(&self, dir: &Path, depth: usize, lines: &mut Vec<String>) {
        if depth > self.max_depth {
            return;
        }
        let prefix = INDENT.repeat(depth - 1);

        let children = match list_children(dir) {
            Ok(children) => children,
            Err(e) => {
                log::warn!("{}", e);
                lines.push(format!("{}{}", prefix, placeholder(&e)));
                return;
            }
        };

        for child in children {
            if !self.classifier.classify(&child.path, child.kind).is_included() {
                continue;
            }
            match child.kind {
                EntryKind::Directory => {
                    lines.push(format!("{}{}/", prefix, child.name));
                    self.render_level(&child.path, depth + 1, lines);
                }
                EntryKind::File if self.root.is_selected(&child.path) => {
                    lines.push(format!("{}>>> {} <<<", prefix, child.name));
                }
                EntryKind::File => {
                    lines.push(format!("{}{}", prefix, child.name));
                }
            }
        }
    }
}

fn list_children(dir: &Path) -> Result<Vec<Child>, AppError> {
    let to_err = |source: io::Error| AppError::DirectoryList {
        path: dir.to_path_buf(),
        source,
    };
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_err)? {
        let entry = entry.map_err(to_err)?;
        let path = entry.path();
        // Follows symlinks; broken links are shown as files.
        let kind = if path.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        children.push(Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            kind,
        });
    }
    children.sort_by_key(|c| (c.kind == EntryKind::File, c.name.to_lowercase()));
    Ok(children)
}

fn placeholder(err: &AppError) -> String {
    match err {
        AppError::DirectoryList { source, .. } if source.kind() != io::ErrorKind::PermissionDenied => {
            format!("[Unreadable directory: {}]", source)
        }
        _ => ACCESS_DENIED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{IgnoreRules, RuleSet};

    fn rules() -> RuleSet {
        RuleSet::new(
            ["build".to_string()],
            ["secret.py".to_string()],
            [".py".to_string(), ".md".to_string()],
            100,
        )
    }

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn render(root: &SelectionRoot, ignore: &IgnoreRules, depth: usize) -> Vec<String> {
        let rules = rules();
        let classifier = PathClassifier::new(&rules, ignore, root);
        TreeRenderer::new(classifier, root, depth).render()
    }

    #[test]
    fn test_directories_first_then_case_insensitive_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.py");
        touch(dir.path(), "A.py");
        touch(dir.path(), "zeta/inner.md");
        touch(dir.path(), "Alpha/x.py");

        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let lines = render(&root, &IgnoreRules::default(), 3);
        assert_eq!(
            lines,
            vec!["Alpha/", "    x.py", "zeta/", "    inner.md", "A.py", "b.py"]
        );
    }

    #[test]
    fn test_exclusions_and_ignore_patterns_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "build/gen.py");
        touch(dir.path(), "secret.py");
        touch(dir.path(), "main.rs");
        touch(dir.path(), "tmp_cache/a.py");
        touch(dir.path(), "keep.py");

        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let lines = render(&root, &IgnoreRules::from_patterns(["tmp_"]), 3);
        assert_eq!(lines, vec!["keep.py"]);
    }

    #[test]
    fn test_directory_at_max_depth_is_listed_but_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/b/c/d/deep.py");
        touch(dir.path(), "a/b/mid.py");

        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let lines = render(&root, &IgnoreRules::default(), 3);
        assert_eq!(lines, vec!["a/", "    b/", "        c/", "        mid.py"]);

        let shallow = render(&root, &IgnoreRules::default(), 1);
        assert_eq!(shallow, vec!["a/"]);
    }

    #[test]
    fn test_selected_file_is_highlighted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "one.py");
        touch(dir.path(), "two.py");

        let root = SelectionRoot::new(&dir.path().join("two.py"), false).unwrap();
        let lines = render(&root, &IgnoreRules::default(), 3);
        assert_eq!(lines, vec!["one.py", ">>> two.py <<<"]);
    }

    #[test]
    fn test_listing_failure_renders_placeholder_line() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "plain.py");
        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let rules = rules();
        let ignore = IgnoreRules::default();
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        let renderer = TreeRenderer::new(classifier, &root, 3);

        let mut lines = Vec::new();
        renderer.render_level(&root.base_path().join("plain.py"), 2, &mut lines);
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0].starts_with("    [Unreadable directory: "),
            "unexpected line: {:?}",
            lines[0]
        );
    }

    #[test]
    fn test_permission_denied_maps_to_access_denied() {
        let err = AppError::DirectoryList {
            path: PathBuf::from("locked"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(placeholder(&err), ACCESS_DENIED);

        let other = AppError::DirectoryList {
            path: PathBuf::from("gone"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(placeholder(&other), "[Unreadable directory: missing]");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_emits_placeholder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "locked/hidden.py");
        touch(dir.path(), "open.py");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let lines = render(&root, &IgnoreRules::default(), 3);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users can still list the directory.
        if lines.contains(&"    hidden.py".to_string()) {
            return;
        }
        assert_eq!(lines, vec!["locked/", "    [Access denied]", "open.py"]);
    }
}
