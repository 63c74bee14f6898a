use crate::classify::{EntryKind, PathClassifier, Verdict};
use crate::error::AppError;
use log;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks `base` and returns every file the classifier includes.
///
/// Entries are visited depth-first with siblings in byte order of their file
/// names, so a directory's files and subdirectories interleave by name
/// (`a.py`, `b/x.py`, `c.py`). Excluded directories are pruned rather than
/// filtered afterwards. Unreadable entries are logged and skipped.
pub fn gather_included_files(base: &Path, classifier: &PathClassifier<'_>) -> Vec<PathBuf> {
    log::info!("Walking project directory: {}", base.display());
    let walker = WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let verdict = classifier.classify(entry.path(), EntryKind::Directory);
            if verdict != Verdict::Included {
                log::trace!("Pruning directory ({:?}): {}", verdict, entry.path().display());
                return false;
            }
            true
        });

    let mut files = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping entry: {}", AppError::from(e));
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if classifier
            .classify(entry.path(), EntryKind::File)
            .is_included()
        {
            files.push(entry.into_path());
        }
    }
    log::info!("Directory walk complete. {} files included.", files.len());
    files
}
