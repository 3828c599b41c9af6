use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::debouncer::is_temp_file;
use super::types::{ChangeKind, DebouncedEvents};
use crate::utils::walk;

/// Turns raw debounced events into actionable ones.
///
/// Pipeline: correct_by_existence → expand_created_dirs → filter_actionable
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(raw: FxHashMap<PathBuf, ChangeKind>) -> Option<DebouncedEvents> {
        let mut changes = raw;

        Self::correct_by_existence(&mut changes);
        Self::expand_created_dirs(&mut changes);
        Self::filter_actionable(&mut changes);

        if changes.is_empty() {
            return None;
        }
        let mut events: Vec<_> = changes.into_iter().collect();
        events.sort();
        Some(DebouncedEvents(events))
    }

    /// Reconcile event kinds with what is on disk now.
    ///
    /// Atomic saves report Removed for a file that still exists, and a file
    /// created then deleted within the window may still read as Created.
    fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let paths: Vec<_> = changes.keys().cloned().collect();
        for path in paths {
            let kind = changes[&path];
            let exists = path.exists();
            match kind {
                ChangeKind::Created if !exists => {
                    crate::debug!("watch"; "discard created (gone): {}", path.display());
                    changes.remove(&path);
                }
                ChangeKind::Modified if !exists => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    changes.insert(path, ChangeKind::Removed);
                }
                ChangeKind::Removed if exists => {
                    crate::debug!("watch"; "downgrade removed->modified: {}", path.display());
                    changes.insert(path, ChangeKind::Modified);
                }
                _ => {}
            }
        }
    }

    /// A directory moved into the tree arrives as one Created event; queue its files.
    fn expand_created_dirs(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let dirs: Vec<_> = changes
            .iter()
            .filter(|(p, k)| **k == ChangeKind::Created && p.is_dir())
            .map(|(p, _)| p.clone())
            .collect();

        for dir in dirs {
            changes.remove(&dir);
            match walk::files(&dir, |p| !is_temp_file(p)) {
                Ok(files) => {
                    crate::debug!("watch"; "expand created dir ({} files): {}", files.len(), dir.display());
                    for file in files {
                        changes.entry(file).or_insert(ChangeKind::Created);
                    }
                }
                Err(e) => crate::log!("watch"; "failed to scan {}: {}", dir.display(), e),
            }
        }
    }

    /// Created/Modified must be a regular file; Removed always passes.
    pub(super) fn filter_actionable(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        changes.retain(|p, k| match k {
            ChangeKind::Created | ChangeKind::Modified => p.is_file(),
            ChangeKind::Removed => true,
        });
    }
}
