//! Configuration file generation.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::config::KilnConfig;

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Write the commented `kiln.toml` template to `path`.
pub fn write_config(path: &Path) -> Result<()> {
    fs::write(path, KilnConfig::template())
        .with_context(|| format!("failed to write config file '{}'", path.display()))
}

/// Write `.gitignore`/`.ignore` listing the output directory.
///
/// Existing ignore files are left alone.
pub fn write_ignore_files(root: &Path, output_dir: &Path) -> Result<()> {
    let output_pattern = Path::new("/").join(output_dir);
    let content = [
        format!("{}/", output_pattern.to_string_lossy().trim_end_matches('/')),
        ".DS_Store".to_string(),
    ]
    .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
    }

    Ok(())
}
