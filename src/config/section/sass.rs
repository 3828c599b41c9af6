//! `[build.sass]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build.sass]
//! dir = "sass"
//! output = "assets/css"
//! command = ["sass"]                 # or ["npx", "sass"]
//! browsers = ["defaults", "not op_mini all"]
//! minify = false
//! ```

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Sass compile and CSS post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build.sass")]
pub struct SassConfig {
    /// Sass directory under `build.src`.
    pub dir: PathBuf,

    /// CSS output directory under `build.dist`.
    pub output: PathBuf,

    /// Sass compiler command (dart-sass CLI).
    pub command: Vec<String>,

    /// Browserslist queries used for vendor prefixing.
    pub browsers: Vec<String>,

    /// Minify the generated CSS.
    pub minify: bool,
}

impl Default for SassConfig {
    fn default() -> Self {
        Self {
            dir: "sass".into(),
            output: "assets/css".into(),
            command: vec!["sass".into()],
            browsers: vec!["defaults".into(), "not op_mini all".into()],
            minify: false,
        }
    }
}

impl SassConfig {
    /// Validate sass configuration.
    ///
    /// An empty command is an error; a command missing from `PATH` only
    /// warns, since `kiln prune-images` and friends never run it.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(cmd) = self.command.first() else {
            diag.error(Self::FIELDS.command, "must name the sass executable");
            return;
        };

        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());
        if which::which(cmd).is_err() && !is_package_runner {
            diag.warn(
                Self::FIELDS.command,
                format!("`{cmd}` not found in PATH, sass compilation will fail"),
            );
        }

        if let Err(e) = crate::asset::style::parse_targets(&self.browsers) {
            diag.error(Self::FIELDS.browsers, e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.sass.command, vec!["sass"]);
        assert_eq!(config.build.sass.browsers, vec!["defaults", "not op_mini all"]);
        assert!(!config.build.sass.minify);
    }

    #[test]
    fn test_package_runner_command() {
        let config = test_parse_config("[build.sass]\ncommand = [\"npx\", \"sass\"]");
        assert_eq!(config.build.sass.command, vec!["npx", "sass"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = test_parse_config("[build.sass]\ncommand = []");
        let mut diag = ConfigDiagnostics::new();
        config.build.sass.validate(&mut diag);
        assert_eq!(diag.errors()[0].field.as_str(), "build.sass.command");
    }

    #[test]
    fn test_invalid_browsers_rejected() {
        let config = test_parse_config("[build.sass]\ncommand = [\"npx\"]\nbrowsers = [\"not a query ???\"]");
        let mut diag = ConfigDiagnostics::new();
        config.build.sass.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "build.sass.browsers"));
    }
}
