//! Which transform a changed source path belongs to.

use std::path::{Component, Path};

use crate::asset::copy::is_html;
use crate::config::KilnConfig;
use crate::prune::ImageExt;

/// Category of a watched file, determines what gets rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// `*.html` under `src` (outside `html_exclude`)
    Html,
    /// anything under the sass dir
    Style,
    /// anything under the js dir
    Script,
    /// jpg/jpeg/png under the images dir
    Raster,
    /// svg under the images dir
    Vector,
    /// any other path under the images dir; a directory when removed
    ImageOther,
    /// `kiln.toml`
    Config,
    /// ignored
    Unknown,
}

impl FileCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Style => "sass",
            Self::Script => "js",
            Self::Raster => "image",
            Self::Vector => "svg",
            Self::ImageOther => "image dir",
            Self::Config => "config",
            Self::Unknown => "unknown",
        }
    }
}

/// Categorize a normalized absolute path.
pub fn categorize_path(path: &Path, config: &KilnConfig) -> FileCategory {
    let build = &config.build;

    if path == config.config_path {
        return FileCategory::Config;
    }
    // dist may sit inside src; never react to our own output
    if path.starts_with(&build.dist) || !path.starts_with(&build.src) {
        return FileCategory::Unknown;
    }

    if path.starts_with(build.sass_source()) {
        FileCategory::Style
    } else if path.starts_with(build.js_source()) {
        FileCategory::Script
    } else if path.starts_with(build.image_roots().source()) {
        match ImageExt::of(path) {
            Some(ImageExt::Raster) => FileCategory::Raster,
            Some(ImageExt::Vector) => FileCategory::Vector,
            Some(ImageExt::Derived) => FileCategory::Unknown,
            None => FileCategory::ImageOther,
        }
    } else if is_html(path) && !in_excluded_dir(path, &build.src, &build.html_exclude) {
        FileCategory::Html
    } else {
        FileCategory::Unknown
    }
}

fn in_excluded_dir(path: &Path, src: &Path, excluded: &[String]) -> bool {
    let Ok(rel) = path.strip_prefix(src) else {
        return false;
    };
    rel.parent().is_some_and(|dirs| {
        dirs.components().any(|c| match c {
            Component::Normal(name) => excluded.iter().any(|e| name == e.as_str()),
            _ => false,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> KilnConfig {
        let mut config = KilnConfig::default();
        config.root = PathBuf::from("/site");
        config.config_path = PathBuf::from("/site/kiln.toml");
        config.build.normalize(Path::new("/site"));
        config
    }

    #[test]
    fn test_categorize() {
        let config = config();
        let cases = [
            ("/site/kiln.toml", FileCategory::Config),
            ("/site/src/index.html", FileCategory::Html),
            ("/site/src/about/index.html", FileCategory::Html),
            ("/site/src/sass/_base.scss", FileCategory::Style),
            ("/site/src/js/main.js", FileCategory::Script),
            ("/site/src/images/top/hero.JPG", FileCategory::Raster),
            ("/site/src/images/icon.svg", FileCategory::Vector),
            ("/site/src/images/gallery", FileCategory::ImageOther),
            ("/site/src/images/notes.txt", FileCategory::ImageOther),
            ("/site/src/images/stray.avif", FileCategory::Unknown),
            ("/site/src/node_modules/x/index.html", FileCategory::Unknown),
            ("/site/src/readme.md", FileCategory::Unknown),
            ("/site/dist/index.html", FileCategory::Unknown),
            ("/elsewhere/index.html", FileCategory::Unknown),
        ];
        for (path, expected) in cases {
            assert_eq!(categorize_path(Path::new(path), &config), expected, "{path}");
        }
    }

    #[test]
    fn test_dist_inside_src_is_ignored() {
        let mut config = KilnConfig::default();
        config.build.src = ".".into();
        config.build.dist = "public".into();
        config.build.normalize(Path::new("/site"));
        assert_eq!(
            categorize_path(Path::new("/site/public/index.html"), &config),
            FileCategory::Unknown
        );
        assert_eq!(
            categorize_path(Path::new("/site/index.html"), &config),
            FileCategory::Html
        );
    }
}
