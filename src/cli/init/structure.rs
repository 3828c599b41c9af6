//! Source skeleton creation.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::config::BuildConfig;

/// Create `src` and its sass/js/images subdirectories under `root`.
pub fn create_structure(root: &Path, build: &BuildConfig) -> Result<()> {
    let src = root.join(&build.src);
    let dirs = [
        src.clone(),
        src.join(&build.sass.dir),
        src.join(&build.js.dir),
        src.join(&build.images.dir),
    ];

    for path in dirs {
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create directory '{}'", path.display()))?;
    }

    Ok(())
}
