use crate::rules::{IgnoreRules, RuleSet, dotted_extension};
use crate::selection::SelectionRoot;
use log;
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Included,
    ExcludedByDirectory,
    ExcludedByFileRule,
    ExcludedByExtension,
    ExcludedByIgnoreFile,
}

impl Verdict {
    pub fn is_included(self) -> bool {
        self == Verdict::Included
    }
}

/// Decides inclusion for a single filesystem entry. Traversal order has no
/// influence on the verdict.
#[derive(Debug, Clone, Copy)]
pub struct PathClassifier<'a> {
    rules: &'a RuleSet,
    ignore: &'a IgnoreRules,
    root: &'a SelectionRoot,
}

impl<'a> PathClassifier<'a> {
    pub fn new(rules: &'a RuleSet, ignore: &'a IgnoreRules, root: &'a SelectionRoot) -> Self {
        Self {
            rules,
            ignore,
            root,
        }
    }

    /// Classifies `path`, which must lie under the selection's base path.
    ///
    /// Rules are applied in order, first match wins: excluded directory name,
    /// excluded ancestor, excluded file name or extension, extension not
    /// allowed, ignore-file substring. The explicitly selected file bypasses
    /// all of them.
    pub fn classify(&self, path: &Path, kind: EntryKind) -> Verdict {
        if kind == EntryKind::File && self.root.is_selected(path) {
            log::trace!("Selected file always included: {}", path.display());
            return Verdict::Included;
        }

        let relative = relative_path(self.root.base_path(), path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let verdict = if kind == EntryKind::Directory && self.rules.is_excluded_dir(&name) {
            Verdict::ExcludedByDirectory
        } else if has_excluded_ancestor(self.rules, Path::new(&relative)) {
            Verdict::ExcludedByDirectory
        } else if kind == EntryKind::File
            && self
                .rules
                .is_excluded_file(&name, dotted_extension(path).as_deref())
        {
            Verdict::ExcludedByFileRule
        } else if kind == EntryKind::File
            && !self
                .rules
                .is_allowed_extension(dotted_extension(path).as_deref())
        {
            Verdict::ExcludedByExtension
        } else if self.ignore.matches(&relative) {
            Verdict::ExcludedByIgnoreFile
        } else {
            Verdict::Included
        };

        log::trace!("{:?}: {}", verdict, relative);
        verdict
    }
}

/// Relative path of `path` under `base` as a forward-slash string.
pub fn relative_path(base: &Path, path: &Path) -> String {
    let relative = pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

fn has_excluded_ancestor(rules: &RuleSet, relative: &Path) -> bool {
    let mut components: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();
    components.pop();
    components.iter().any(|segment| rules.is_excluded_dir(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn rules() -> RuleSet {
        RuleSet::new(
            ["build".to_string(), ".git".to_string()],
            [".so".to_string(), "settings.py".to_string()],
            [".py".to_string(), ".md".to_string()],
            50,
        )
    }

    fn project() -> (tempfile::TempDir, SelectionRoot, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = SelectionRoot::new(dir.path(), false).unwrap();
        let base = root.base_path().to_path_buf();
        (dir, root, base)
    }

    #[test]
    fn test_excluded_directory_by_name() {
        let (_dir, root, base) = project();
        let rules = rules();
        let ignore = IgnoreRules::default();
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        assert_eq!(
            classifier.classify(&base.join("build"), EntryKind::Directory),
            Verdict::ExcludedByDirectory
        );
        assert_eq!(
            classifier.classify(&base.join("src"), EntryKind::Directory),
            Verdict::Included
        );
    }

    #[test]
    fn test_nested_file_under_excluded_directory() {
        let (_dir, root, base) = project();
        let rules = rules();
        let ignore = IgnoreRules::default();
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        assert_eq!(
            classifier.classify(&base.join("a/b/build/c/gen.py"), EntryKind::File),
            Verdict::ExcludedByDirectory
        );
        // A file that merely shares the name is not a directory exclusion.
        assert_eq!(
            classifier.classify(&base.join("build"), EntryKind::File),
            Verdict::ExcludedByExtension
        );
    }

    #[test]
    fn test_file_rules_take_precedence_over_extension() {
        let (_dir, root, base) = project();
        let rules = rules();
        let ignore = IgnoreRules::default();
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        assert_eq!(
            classifier.classify(&base.join("settings.py"), EntryKind::File),
            Verdict::ExcludedByFileRule
        );
        assert_eq!(
            classifier.classify(&base.join("lib/native.so"), EntryKind::File),
            Verdict::ExcludedByFileRule
        );
        assert_eq!(
            classifier.classify(&base.join("main.rs"), EntryKind::File),
            Verdict::ExcludedByExtension
        );
        assert_eq!(
            classifier.classify(&base.join("README.md"), EntryKind::File),
            Verdict::Included
        );
    }

    #[test]
    fn test_ignore_patterns_apply_last() {
        let (_dir, root, base) = project();
        let rules = rules();
        let ignore = IgnoreRules::from_patterns(["generated", ".so"]);
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        assert_eq!(
            classifier.classify(&base.join("src/generated_api.py"), EntryKind::File),
            Verdict::ExcludedByIgnoreFile
        );
        assert_eq!(
            classifier.classify(&base.join("generated"), EntryKind::Directory),
            Verdict::ExcludedByIgnoreFile
        );
        assert_eq!(
            classifier.classify(&base.join("x.so"), EntryKind::File),
            Verdict::ExcludedByFileRule
        );
    }

    #[test]
    fn test_selected_file_bypasses_every_rule() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        let file = build.join("settings.so");
        fs::write(&file, "binary-ish").unwrap();

        let root = SelectionRoot::new(&file, false).unwrap();
        let rules = rules();
        let ignore = IgnoreRules::from_patterns(["settings"]);
        let classifier = PathClassifier::new(&rules, &ignore, &root);
        let selected = root.selected_file().unwrap().to_path_buf();
        assert_eq!(classifier.classify(&selected, EntryKind::File), Verdict::Included);

        let sibling = root.base_path().join("other.so");
        assert_eq!(
            classifier.classify(&sibling, EntryKind::File),
            Verdict::ExcludedByFileRule
        );
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let base = Path::new("/project");
        assert_eq!(relative_path(base, Path::new("/project/src/app.py")), "src/app.py");
    }
}
