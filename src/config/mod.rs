//! Project configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Section definitions ([build], [build.*], [serve])
//! ├── types/         # ConfigError, diagnostics, field paths, global handle
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # KilnConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, DerivedFormat, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl KilnConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-init commands, searches upward from cwd to find the config
    /// file; the project root is the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if cli.is_init() {
            let mut config = Self::default();
            config.cli = Some(cli);
            config.config_path = config_path;
            if let Some(root) = config.config_path.parent() {
                config.root = root.to_path_buf();
            }
            return Ok(config);
        }

        if !exists {
            return Err(ConfigError::NotFound(cli.config.clone()).into());
        }

        let mut config = Self::from_path(&config_path)?;
        Self::check(|diag| config.build.validate_paths(diag))?;

        config.config_path = crate::utils::path::normalize_path(&config_path);
        config.cli = Some(cli);
        config.finalize(cli);

        config.validate()?;
        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if let Some(Commands::Init { name }) = &cli.command {
            let dir = name.as_ref().map_or_else(|| cwd.clone(), |name| cwd.join(name));
            let path = dir.join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Resolve paths and apply CLI overrides after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.root = root;
        self.build.normalize(&self.root);
        self.apply_command_options(cli);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root (for log output).
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Commented TOML template written by `kiln init`.
    pub fn template() -> String {
        let mut out = String::from("# kiln configuration\n\n");
        out.push_str(&BuildConfig::template_with_header());
        out.push('\n');
        out.push_str(&ServeConfig::template_with_header());
        out
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            watch,
        } = cli.command()
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        Self::check(|diag| self.build.validate(diag))
    }

    fn check(f: impl FnOnce(&mut ConfigDiagnostics)) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        f(&mut diag);
        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KilnConfig {
    let (parsed, ignored) = KilnConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = toml::from_str::<KilnConfig>("[build\nsrc = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_default() {
        let config = KilnConfig::default();
        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.serve.port, 3000);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\nsrc = \"web\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = KilnConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.src, PathBuf::from("web"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = KilnConfig::parse_with_ignored("[serve]\nport = 1").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_template_round_trips() {
        let template = KilnConfig::template();
        assert!(template.contains("[build]"));
        assert!(template.contains("[build.sass]"));
        assert!(template.contains("[build.images]"));
        assert!(template.contains("[serve]"));

        let parsed = test_parse_config(&template);
        assert_eq!(parsed.build.images.keep, vec!["sora.jpg"]);
        assert_eq!(parsed.serve.ws_port, 35729);
    }

    #[test]
    fn test_root_relative() {
        let config = KilnConfig {
            root: PathBuf::from("/site"),
            ..KilnConfig::default()
        };
        assert_eq!(
            config.root_relative("/site/src/images/a.png"),
            PathBuf::from("src/images/a.png")
        );
        assert_eq!(config.root_relative("/other/x"), PathBuf::from("/other/x"));
    }
}
