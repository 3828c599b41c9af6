//! `[build.images]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build.images]
//! dir = "images"
//! output = "assets/images"
//! derived = "avif"            # or "webp"
//! jpeg_quality = 75
//! avif_quality = 70
//! avif_speed = 6
//! keep = ["sora.jpg"]
//! svg_remove_dimensions = true
//! ```

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Image pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "build.images")]
pub struct ImagesConfig {
    /// Image source directory under `build.src`.
    pub dir: PathBuf,

    /// Image output directory under `build.dist`.
    pub output: PathBuf,

    /// Format derived from every jpg/png source.
    #[config(inline_doc = "\"avif\" or \"webp\"")]
    pub derived: DerivedFormat,

    /// JPEG re-encode quality.
    #[config(inline_doc = "1-100")]
    pub jpeg_quality: u8,

    /// AVIF encode quality.
    #[config(inline_doc = "1-100")]
    pub avif_quality: u8,

    /// AVIF encoder speed, 1 (slowest, smallest) to 10 (fastest).
    pub avif_speed: u8,

    /// Paths under the image output kept by `kiln clean-images`.
    pub keep: Vec<String>,

    /// Strip width/height from the root `<svg>` (viewBox is kept).
    pub svg_remove_dimensions: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: "images".into(),
            output: "assets/images".into(),
            derived: DerivedFormat::Avif,
            jpeg_quality: 75,
            avif_quality: 70,
            avif_speed: 6,
            keep: vec!["sora.jpg".into()],
            svg_remove_dimensions: true,
        }
    }
}

impl ImagesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            (Self::FIELDS.jpeg_quality, self.jpeg_quality),
            (Self::FIELDS.avif_quality, self.avif_quality),
        ] {
            if !(1..=100).contains(&value) {
                diag.error(field, format!("must be between 1 and 100, got {value}"));
            }
        }
        if !(1..=10).contains(&self.avif_speed) {
            diag.error(
                Self::FIELDS.avif_speed,
                format!("must be between 1 and 10, got {}", self.avif_speed),
            );
        }
    }
}

/// Derived image encoding written next to compressed rasters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedFormat {
    #[default]
    Avif,
    Webp,
}

impl DerivedFormat {
    /// File extension without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
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
        let images = &config.build.images;
        assert_eq!(images.derived, DerivedFormat::Avif);
        assert_eq!(images.jpeg_quality, 75);
        assert_eq!(images.avif_quality, 70);
        assert_eq!(images.keep, vec!["sora.jpg"]);
        assert!(images.svg_remove_dimensions);
    }

    #[test]
    fn test_webp_format() {
        let config = test_parse_config("[build.images]\nderived = \"webp\"");
        assert_eq!(config.build.images.derived, DerivedFormat::Webp);
        assert_eq!(config.build.images.derived.extension(), "webp");
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = toml::from_str::<crate::config::KilnConfig>("[build.images]\nderived = \"jxl\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_quality_out_of_range() {
        let config = test_parse_config("[build.images]\njpeg_quality = 0\navif_speed = 11");
        let mut diag = ConfigDiagnostics::new();
        config.build.images.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_template_lists_fields() {
        let template = ImagesConfig::template_with_header();
        assert!(template.contains("[build.images]"));
        assert!(template.contains("derived = \"avif\"  # \"avif\" or \"webp\""));
        assert!(template.contains("keep = [\"sora.jpg\"]"));
    }
}
