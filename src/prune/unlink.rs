//! Reactive deletion when a watched source image disappears.

use std::path::{Path, PathBuf};

use super::reconcile::reconcile_under;
use super::resolve::{DERIVED_EXTENSIONS, ImageExt, ImageRoots, with_extension};
use super::{Result, remove_all};

/// Which unlink variant applies to a removed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    /// jpg/jpeg/png: compressed copy plus both derived siblings.
    Raster,
    /// svg: the optimized copy only.
    Vector,
    /// A removed or moved-away directory (or any other extensionless path).
    /// Its mirrored output subtree is swept for orphans.
    Directory,
}

impl SourceKind {
    pub fn of(path: &Path) -> Option<Self> {
        match ImageExt::of(path)? {
            ImageExt::Raster => Some(Self::Raster),
            ImageExt::Vector => Some(Self::Vector),
            ImageExt::Derived => None,
        }
    }
}

/// Output paths a removed source may have produced.
///
/// Both derived formats are listed for raster sources regardless of the
/// configured one, so switching formats never strands files. A directory
/// maps to its mirrored output directory; its contents are found by scanning.
pub fn outputs_for(roots: &ImageRoots, source: &Path, kind: SourceKind) -> Result<Vec<PathBuf>> {
    let dest = roots.resolve_destination(source)?;
    Ok(match kind {
        SourceKind::Raster => {
            let mut outputs = Vec::with_capacity(1 + DERIVED_EXTENSIONS.len());
            outputs.extend(DERIVED_EXTENSIONS.iter().map(|ext| with_extension(&dest, ext)));
            outputs.insert(0, dest);
            outputs
        }
        SourceKind::Vector | SourceKind::Directory => vec![dest],
    })
}

/// Delete the outputs of a removed source. Absent outputs are not an error.
pub async fn delete_outputs_for(
    roots: &ImageRoots,
    source: &Path,
    kind: SourceKind,
) -> Result<Vec<PathBuf>> {
    match kind {
        SourceKind::Directory => {
            let dest = roots.resolve_destination(source)?;
            Ok(reconcile_under(roots, &dest).await?.removed)
        }
        SourceKind::Raster | SourceKind::Vector => remove_all(outputs_for(roots, source, kind)?).await,
    }
}

/// Run [`delete_outputs_for`] and hand the outcome to `done`.
///
/// `done` is called exactly once, with the error if any deletion failed.
pub async fn on_unlink<F>(roots: &ImageRoots, source: &Path, kind: SourceKind, done: F)
where
    F: FnOnce(Result<Vec<PathBuf>>),
{
    done(delete_outputs_for(roots, source, kind).await);
}
