use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Debounced file events that survived classification.
pub(super) struct DebouncedEvents(pub(super) Vec<(PathBuf, ChangeKind)>);

impl DebouncedEvents {
    /// `(changed, removed)`: created and modified files are handled alike.
    pub(super) fn split(self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut changed = Vec::new();
        let mut removed = Vec::new();

        for (path, kind) in self.0 {
            match kind {
                ChangeKind::Created | ChangeKind::Modified => changed.push(path),
                ChangeKind::Removed => removed.push(path),
            }
        }

        (changed, removed)
    }
}
