//! Target directory checks before `kiln init` writes anything.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Where the project is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// `kiln init`: the current directory, which must be empty.
    CurrentDir,
    /// `kiln init <name>`: a new subdirectory, which must not exist.
    NewDir,
}

pub fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    match mode {
        InitMode::CurrentDir if !is_empty_or_missing(root)? => bail!(
            "current directory is not empty\n\
             use `kiln init <name>` to create the project in a new subdirectory"
        ),
        InitMode::NewDir if root.exists() => {
            bail!("'{}' already exists, choose another name", root.display())
        }
        _ => Ok(()),
    }
}

fn is_empty_or_missing(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("failed to read directory '{}'", path.display()))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_current_dir_must_be_empty() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_ok());

        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        assert!(validate_target(temp.path(), InitMode::CurrentDir).is_err());
    }

    #[test]
    fn test_new_dir_must_not_exist() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(temp.path(), InitMode::NewDir).is_err());
        assert!(validate_target(&temp.path().join("site"), InitMode::NewDir).is_ok());
    }
}
