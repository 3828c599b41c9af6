//! Page and front-end asset transforms: html/js mirroring and Sass.
//!
//! Each transform takes the list of source files it should handle, so the
//! full build and the watch loop (which passes only changed files) share
//! one code path.

pub mod copy;
pub mod minify;
pub mod style;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

/// Map `source` under `src_root` to the same relative path under `dest_root`.
pub fn mirror_path(source: &Path, src_root: &Path, dest_root: &Path) -> Result<PathBuf> {
    let rel = source.strip_prefix(src_root).map_err(|_| {
        anyhow!(
            "`{}` is not under `{}`",
            source.display(),
            src_root.display()
        )
    })?;
    Ok(dest_root.join(rel))
}

/// Counts from one transform run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Outputs written.
    pub written: usize,
    /// Outputs already up to date.
    pub skipped: usize,
}

impl TransformStats {
    pub fn total(&self) -> usize {
        self.written + self.skipped
    }
}

impl std::ops::Add for TransformStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            written: self.written + rhs.written,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_path() {
        let out = mirror_path(Path::new("/s/js/app/main.js"), Path::new("/s/js"), Path::new("/d/assets/js"))
            .unwrap();
        assert_eq!(out, PathBuf::from("/d/assets/js/app/main.js"));
        assert!(mirror_path(Path::new("/x/a.js"), Path::new("/s"), Path::new("/d")).is_err());
    }

    #[test]
    fn test_stats_add() {
        let a = TransformStats { written: 2, skipped: 1 };
        let b = TransformStats { written: 1, skipped: 0 };
        assert_eq!((a + b).total(), 4);
    }
}
