//! Project initialization.
//!
//! - [`validate`]: target directory checks
//! - [`structure`]: source skeleton
//! - [`config`]: `kiln.toml` and ignore files

mod config;
mod structure;
mod validate;

use anyhow::Result;

use crate::config::KilnConfig;
use crate::log;

pub use validate::InitMode;

/// Create `kiln.toml` and the source skeleton in the config's root.
///
/// `kiln init` requires an empty current directory; `kiln init <name>`
/// requires that `<name>` does not exist yet.
pub fn new_project(config: &KilnConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();
    let mode = if has_name {
        InitMode::NewDir
    } else {
        InitMode::CurrentDir
    };

    validate::validate_target(root, mode)?;
    structure::create_structure(root, &config.build)?;
    config::write_config(&config.config_path)?;
    config::write_ignore_files(root, &config.build.dist)?;

    log!("init"; "created {}", config.config_path.display());
    Ok(())
}
