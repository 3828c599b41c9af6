//! Full-tree orphan sweep over the image output root.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::task::JoinSet;

use super::resolve::{ImageExt, ImageRoots, RASTER_EXTENSIONS};
use super::{PruneError, PruneReport, Result, remove_all};
use crate::utils::walk;

/// Source files whose existence keeps `dest_path` alive.
///
/// A derived file is kept by any raster sibling with the same stem. Every
/// other image output is kept only by the source at the identical relative path.
pub fn source_candidates(roots: &ImageRoots, dest_path: &Path) -> Result<Vec<PathBuf>> {
    let rel = roots.relative_to_dest(dest_path)?;
    let source = roots.source_at(&rel);

    Ok(match ImageExt::of(&rel) {
        Some(ImageExt::Derived) => RASTER_EXTENSIONS
            .iter()
            .map(|ext| source.with_extension(ext))
            .collect(),
        _ => vec![source],
    })
}

/// Delete every output image whose originating source no longer exists.
///
/// Existence probes and deletions are issued concurrently. The pass fails on
/// the first non-`NotFound` error, after all in-flight work has settled;
/// deletions already made are kept.
pub async fn reconcile_orphans(roots: &ImageRoots) -> Result<PruneReport> {
    reconcile_under(roots, roots.dest()).await
}

/// [`reconcile_orphans`] limited to the outputs below `dest_dir`.
///
/// A `dest_dir` that is missing or not a directory yields an empty report.
pub async fn reconcile_under(roots: &ImageRoots, dest_dir: &Path) -> Result<PruneReport> {
    let outputs = scan_outputs(dest_dir).await?;
    let scanned = outputs.len();

    let mut probes = JoinSet::new();
    for output in outputs {
        let candidates = source_candidates(roots, &output)?;
        probes.spawn(async move {
            for candidate in &candidates {
                let exists = fs::try_exists(candidate).await.map_err(|source| {
                    PruneError::Scan {
                        path: candidate.clone(),
                        source,
                    }
                })?;
                if exists {
                    return Ok(None);
                }
            }
            Ok::<_, PruneError>(Some(output))
        });
    }

    let mut orphans = Vec::new();
    let mut first_err = None;
    while let Some(joined) = probes.join_next().await {
        match joined.map_err(PruneError::from).and_then(|r| r) {
            Ok(Some(orphan)) => orphans.push(orphan),
            Ok(None) => {}
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    let removed = remove_all(orphans).await?;
    Ok(PruneReport { scanned, removed })
}

/// Every image file under `dest` (any known extension).
async fn scan_outputs(dest: &Path) -> Result<Vec<PathBuf>> {
    let root = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        walk::files(&root, |p| ImageExt::of(p).is_some())
            .map_err(|source| PruneError::Scan { path: root, source })
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_for_derived() {
        let roots = ImageRoots::new("/s", "/d");
        let c = source_candidates(&roots, Path::new("/d/top/old.AVIF")).unwrap();
        assert_eq!(
            c,
            vec![
                PathBuf::from("/s/top/old.jpg"),
                PathBuf::from("/s/top/old.jpeg"),
                PathBuf::from("/s/top/old.png"),
            ]
        );
    }

    #[test]
    fn test_candidates_for_same_format() {
        let roots = ImageRoots::new("/s", "/d");
        for p in ["a.jpg", "b/c.PNG", "icon.svg", "x.jpeg"] {
            let dest = Path::new("/d").join(p);
            assert_eq!(source_candidates(&roots, &dest).unwrap(), vec![Path::new("/s").join(p)]);
        }
    }

    #[test]
    fn test_candidates_outside_dest() {
        let roots = ImageRoots::new("/s", "/d");
        assert!(source_candidates(&roots, Path::new("/elsewhere/a.jpg")).is_err());
    }
}
