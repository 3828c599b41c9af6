//! Keeping the image output tree in sync with its sources.
//!
//! Destination images under the image output root mirror the source image
//! root. Raster sources additionally produce a derived `.avif`/`.webp`
//! sibling. When sources disappear, these operations remove the outputs
//! they left behind:
//!
//! | Operation             | Trigger                               |
//! |-----------------------|---------------------------------------|
//! | [`delete_outputs_for`]| watcher saw a source removal          |
//! | [`reconcile_orphans`] | `kiln prune-images`, full-tree sweep  |
//! | [`cleanup_except`]    | `kiln clean-images`, maintenance only |
//!
//! All deletions run concurrently and treat an already-missing file as
//! success. The first real I/O error is reported only after every
//! deletion in the batch has settled; nothing is rolled back.

mod cleanup;
mod reconcile;
mod remove;
mod resolve;
mod unlink;


use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use cleanup::cleanup_except;
pub use reconcile::{reconcile_orphans, reconcile_under, source_candidates};
pub use remove::{remove_all, remove_if_exists};
pub use resolve::{ImageExt, ImageRoots, with_extension};
pub use unlink::{SourceKind, delete_outputs_for, on_unlink, outputs_for};

/// Errors from path mapping and deletion.
#[derive(Debug, Error)]
pub enum PruneError {
    /// A path that should live under `root` resolves outside of it.
    #[error("`{}` is not inside `{}`", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("failed to remove `{}`", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan `{}`", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("deletion task did not complete")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = PruneError> = std::result::Result<T, E>;

/// Outcome of a sweep over the output tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Candidate files examined.
    pub scanned: usize,
    /// Files actually deleted by this run, sorted.
    pub removed: Vec<PathBuf>,
}
