//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! src = "src"
//! dist = "dist"
//! html_exclude = ["node_modules"]
//! ```

use std::path::{Path, PathBuf};

use macros::Config;
use serde::{Deserialize, Serialize};

use super::{ImagesConfig, JsConfig, SassConfig};
use crate::config::ConfigDiagnostics;
use crate::prune::ImageRoots;

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build")]
pub struct BuildConfig {
    /// Source root (relative to kiln.toml).
    pub src: PathBuf,

    /// Output root, deleted by `kiln clean`.
    pub dist: PathBuf,

    /// Directory names skipped when copying html.
    pub html_exclude: Vec<String>,

    #[config(sub)]
    pub js: JsConfig,

    #[config(sub)]
    pub sass: SassConfig,

    #[config(sub)]
    pub images: ImagesConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src: "src".into(),
            dist: "dist".into(),
            html_exclude: vec!["node_modules".into()],
            js: JsConfig::default(),
            sass: SassConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Make `src`/`dist` absolute against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.src = crate::utils::path::normalize_path(&root.join(&self.src));
        self.dist = crate::utils::path::normalize_path(&root.join(&self.dist));
    }

    /// Pre-normalization checks: subdirectories must stay relative.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        let relative = [
            (JsConfig::FIELDS.dir, &self.js.dir),
            (JsConfig::FIELDS.output, &self.js.output),
            (SassConfig::FIELDS.dir, &self.sass.dir),
            (SassConfig::FIELDS.output, &self.sass.output),
            (ImagesConfig::FIELDS.dir, &self.images.dir),
            (ImagesConfig::FIELDS.output, &self.images.output),
        ];
        for (field, path) in relative {
            if path.is_absolute() {
                diag.error_with_hint(
                    field,
                    format!("must be a relative path, got `{}`", path.display()),
                    format!("{field} is resolved under {} or {}", Self::FIELDS.src, Self::FIELDS.dist),
                );
            }
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.src == self.dist {
            diag.error(
                Self::FIELDS.dist,
                format!("{} and {} must differ", Self::FIELDS.src, Self::FIELDS.dist),
            );
        }
        self.sass.validate(diag);
        self.images.validate(diag);
    }

    pub fn js_source(&self) -> PathBuf {
        self.src.join(&self.js.dir)
    }

    pub fn js_output(&self) -> PathBuf {
        self.dist.join(&self.js.output)
    }

    pub fn sass_source(&self) -> PathBuf {
        self.src.join(&self.sass.dir)
    }

    pub fn sass_output(&self) -> PathBuf {
        self.dist.join(&self.sass.output)
    }

    /// Source/destination image roots for the image transforms and pruning.
    pub fn image_roots(&self) -> ImageRoots {
        ImageRoots::new(
            self.src.join(&self.images.dir),
            self.dist.join(&self.images.output),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.src, PathBuf::from("src"));
        assert_eq!(config.build.dist, PathBuf::from("dist"));
        assert_eq!(config.build.html_exclude, vec!["node_modules"]);
    }

    #[test]
    fn test_normalize_and_routes() {
        let mut config = test_parse_config("[build]\nsrc = \"web\"\ndist = \"public\"");
        config.build.normalize(Path::new("/project"));

        assert_eq!(config.build.src, PathBuf::from("/project/web"));
        assert_eq!(config.build.js_output(), PathBuf::from("/project/public/assets/js"));
        assert_eq!(config.build.sass_source(), PathBuf::from("/project/web/sass"));

        let roots = config.build.image_roots();
        assert_eq!(roots.source(), Path::new("/project/web/images"));
        assert_eq!(roots.dest(), Path::new("/project/public/assets/images"));
    }

    #[test]
    fn test_absolute_subdir_rejected() {
        let config = test_parse_config("[build.images]\noutput = \"/tmp/images\"");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate_paths(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "build.images.output");
    }

    #[test]
    fn test_same_src_and_dist_rejected() {
        let config = test_parse_config("[build]\nsrc = \"site\"\ndist = \"site\"");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field.as_str() == "build.dist"));
    }
}
