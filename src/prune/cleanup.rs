//! One-shot removal of raster outputs, minus an allow-list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{PruneError, PruneReport, Result, remove_all};
use crate::utils::path::to_slash;
use crate::utils::walk;

/// Delete every `.jpg`/`.png` under `dest_root` whose root-relative path is not in `keep`.
///
/// `keep` entries are compared as exact forward-slash relative paths.
pub async fn cleanup_except(dest_root: &Path, keep: &[String]) -> Result<PruneReport> {
    let keep: HashSet<String> = keep.iter().map(|k| k.replace('\\', "/")).collect();

    let root = dest_root.to_path_buf();
    let candidates = tokio::task::spawn_blocking(move || {
        walk::files(&root, is_cleanup_target).map_err(|source| PruneError::Scan { path: root, source })
    })
    .await??;
    let scanned = candidates.len();

    let doomed: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| {
            path.strip_prefix(dest_root)
                .map(|rel| !keep.contains(&*to_slash(rel)))
                .unwrap_or(false)
        })
        .collect();

    let removed = remove_all(doomed).await?;
    Ok(PruneReport { scanned, removed })
}

fn is_cleanup_target(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("jpg" | "png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_targets_are_exact() {
        assert!(is_cleanup_target(Path::new("a.jpg")));
        assert!(is_cleanup_target(Path::new("a/b.png")));
        assert!(!is_cleanup_target(Path::new("a.jpeg")));
        assert!(!is_cleanup_target(Path::new("a.JPG")));
        assert!(!is_cleanup_target(Path::new("a.avif")));
    }
}
