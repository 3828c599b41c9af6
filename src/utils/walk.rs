//! Recursive file enumeration on top of `jwalk`.
//!
//! Hidden entries (dot files and dot directories) are skipped, which
//! matches how shell-style `**/*.ext` globs behave.

use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

/// Collect every regular file under `root` accepted by `keep`.
///
/// A missing root yields an empty list. Any other traversal error is returned.
/// The result is sorted so callers get stable ordering.
pub fn files(root: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    files_excluding(root, &[], keep)
}

/// Like [`files`], but never descends into directories whose name is in `exclude_dirs`.
///
/// The walk is serial: callers already run inside rayon workers, and a
/// pool-backed walk there can starve.
pub fn files_excluding(
    root: &Path,
    exclude_dirs: &[String],
    keep: impl Fn(&Path) -> bool,
) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let excluded = exclude_dirs.to_vec();
    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry| {
                entry.as_ref().map_or(true, |e| {
                    !(e.file_type().is_dir()
                        && excluded.iter().any(|name| e.file_name() == name.as_str()))
                })
            });
        });

    let mut out = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if keep(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Lowercased extension of `path`, if any.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = files(&dir.path().join("nope"), |_| true).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_filter_and_hidden() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.html");
        touch(dir.path(), "sub/b.html");
        touch(dir.path(), "sub/c.css");
        touch(dir.path(), ".cache/d.html");

        let found = files(dir.path(), |p| extension_lower(p).as_deref() == Some("html")).unwrap();
        assert_eq!(found, vec![dir.path().join("a.html"), dir.path().join("sub/b.html")]);
    }

    #[test]
    fn test_excluded_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "node_modules/pkg/readme.html");

        let found = files_excluding(dir.path(), &["node_modules".into()], |_| true).unwrap();
        assert_eq!(found, vec![dir.path().join("index.html")]);
    }

    #[test]
    fn test_walk_inside_saturated_pool() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/b/c.html");
        touch(dir.path(), "d.html");

        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let (left, right) = pool.install(|| {
            rayon::join(
                || files(dir.path(), |_| true),
                || files(dir.path(), |_| true),
            )
        });
        assert_eq!(left.unwrap().len(), 2);
        assert_eq!(right.unwrap().len(), 2);
    }

    #[test]
    fn test_extension_lower() {
        assert_eq!(extension_lower(Path::new("A.JPG")).as_deref(), Some("jpg"));
        assert_eq!(extension_lower(Path::new("README")), None);
    }
}
