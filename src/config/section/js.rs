//! `[build.js]` section configuration.

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

/// Script copy settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build.js")]
pub struct JsConfig {
    /// Script directory under `build.src`.
    pub dir: PathBuf,

    /// Output directory under `build.dist`.
    pub output: PathBuf,

    /// Minify `.js` files while copying.
    pub minify: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            dir: "js".into(),
            output: "assets/js".into(),
            minify: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_js_config() {
        let config = test_parse_config("[build.js]\ndir = \"scripts\"\nminify = true");
        assert_eq!(config.build.js.dir, PathBuf::from("scripts"));
        assert_eq!(config.build.js.output, PathBuf::from("assets/js"));
        assert!(config.build.js.minify);
    }
}
