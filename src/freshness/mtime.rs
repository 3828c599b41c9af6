//! Mtime comparison between a source and the output generated from it.

use std::path::Path;
use std::time::SystemTime;

/// Whether `output` exists and is at least as new as `source`.
///
/// A missing or unreadable source counts as stale, so the caller
/// processes it and surfaces the real error.
pub fn is_output_fresh(source: &Path, output: &Path) -> bool {
    let (Some(source_time), Some(output_time)) = (get_mtime(source), get_mtime(output)) else {
        return false;
    };
    output_time >= source_time
}

/// Modification time, or `None` when the file is missing.
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
    }

    #[test]
    fn test_missing_output_is_stale() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        fs::write(&src, b"x").unwrap();
        assert!(!is_output_fresh(&src, &dir.path().join("out.png")));
    }

    #[test]
    fn test_newer_source_is_stale() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        let out = dir.path().join("out.png");
        fs::write(&src, b"x").unwrap();
        fs::write(&out, b"y").unwrap();

        let now = SystemTime::now();
        set_mtime(&out, now - Duration::from_secs(60));
        set_mtime(&src, now);
        assert!(!is_output_fresh(&src, &out));

        set_mtime(&out, now + Duration::from_secs(1));
        assert!(is_output_fresh(&src, &out));
    }

    #[test]
    fn test_missing_source_is_stale() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.png");
        fs::write(&out, b"y").unwrap();
        assert!(!is_output_fresh(&dir.path().join("gone.png"), &out));
    }
}
