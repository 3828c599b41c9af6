//! Concurrent, idempotent file removal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::task::JoinSet;

use super::{PruneError, Result};

/// Remove a file, treating "already gone" as success.
///
/// Returns whether this call actually deleted something.
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(PruneError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove every path concurrently.
///
/// All deletions are awaited before returning. On failure the first error
/// (in completion order) is returned; deletions that already succeeded stay
/// done. On success, the paths that were actually removed, sorted.
pub async fn remove_all(paths: impl IntoIterator<Item = PathBuf>) -> Result<Vec<PathBuf>> {
    let mut set = JoinSet::new();
    for path in paths {
        set.spawn(async move {
            let removed = remove_if_exists(&path).await?;
            Ok::<_, PruneError>(removed.then_some(path))
        });
    }

    let mut removed = Vec::new();
    let mut first_err = None;
    while let Some(joined) = set.join_next().await {
        match joined.map_err(PruneError::from).and_then(|r| r) {
            Ok(Some(path)) => removed.push(path),
            Ok(None) => {}
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => {
            removed.sort();
            Ok(removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_if_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.avif");
        std::fs::write(&file, b"x").unwrap();

        assert!(remove_if_exists(&file).await.unwrap());
        assert!(!file.exists());
        assert!(!remove_if_exists(&file).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_all_mixed() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, b"x").unwrap();

        let removed = remove_all([b.clone(), a.clone()]).await.unwrap();
        assert_eq!(removed, vec![a.clone()]);
        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_remove_all_reports_error_after_settling() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ok.png");
        let not_a_file = dir.path().join("sub");
        std::fs::write(&file, b"x").unwrap();
        std::fs::create_dir(&not_a_file).unwrap();

        let err = remove_all([not_a_file, file.clone()]).await.unwrap_err();
        assert!(matches!(err, PruneError::Remove { .. }));
        // the other deletion still ran
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_remove_all_empty() {
        assert!(remove_all(Vec::new()).await.unwrap().is_empty());
    }
}
