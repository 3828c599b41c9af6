//! Turning a debounced batch of changed/removed paths into a rebuild plan.
//!
//! Pure: no I/O, no actor machinery.

use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::core::{FileCategory, categorize_path};
use crate::prune::SourceKind;

/// What a batch of file events requires.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    /// `kiln.toml` changed: reload it and rebuild everything.
    pub config_changed: bool,
    pub html: Vec<PathBuf>,
    /// Any sass file changed; partials make a full recompile necessary.
    pub style: bool,
    pub script: Vec<PathBuf>,
    /// Raster and vector sources to recompress / re-derive / re-optimize.
    pub images: Vec<PathBuf>,
    /// Removed image sources whose outputs must go.
    pub unlinked: Vec<(PathBuf, SourceKind)>,
    /// Removed non-image sources; outputs are left alone.
    pub removed_other: Vec<(PathBuf, FileCategory)>,
}

impl RebuildPlan {
    pub fn is_empty(&self) -> bool {
        !self.config_changed
            && !self.style
            && self.html.is_empty()
            && self.script.is_empty()
            && self.images.is_empty()
            && self.unlinked.is_empty()
            && self.removed_other.is_empty()
    }

    pub fn is_config_only(&self) -> bool {
        self.config_changed
            && !self.style
            && self.html.is_empty()
            && self.script.is_empty()
            && self.images.is_empty()
            && self.unlinked.is_empty()
            && self.removed_other.is_empty()
    }

    /// Only stylesheets need refreshing in the browser.
    pub fn is_style_only(&self) -> bool {
        self.style
            && !self.config_changed
            && self.html.is_empty()
            && self.script.is_empty()
            && self.images.is_empty()
            && self.unlinked.is_empty()
    }

    /// Short human summary, e.g. `sass, 2 html, 1 image`.
    pub fn summary(&self) -> String {
        use crate::utils::plural::plural_count;

        let mut parts = Vec::new();
        if self.config_changed {
            parts.push("config".to_string());
        }
        if self.style {
            parts.push("sass".to_string());
        }
        if !self.html.is_empty() {
            parts.push(format!("{} html", self.html.len()));
        }
        if !self.script.is_empty() {
            parts.push(format!("{} js", self.script.len()));
        }
        if !self.images.is_empty() {
            parts.push(plural_count(self.images.len(), "image"));
        }
        if !self.unlinked.is_empty() {
            parts.push(format!("{} removed", self.unlinked.len()));
        }
        parts.join(", ")
    }
}

/// Classify a batch of changed (created or modified) and removed paths.
pub fn classify_changes(changed: &[PathBuf], removed: &[PathBuf], config: &KilnConfig) -> RebuildPlan {
    let mut plan = RebuildPlan::default();

    for path in changed {
        match categorize_path(path, config) {
            FileCategory::Config => plan.config_changed = true,
            FileCategory::Html => plan.html.push(path.clone()),
            FileCategory::Style => plan.style = true,
            FileCategory::Script => plan.script.push(path.clone()),
            FileCategory::Raster | FileCategory::Vector => plan.images.push(path.clone()),
            FileCategory::ImageOther | FileCategory::Unknown => {}
        }
    }

    for path in removed {
        match categorize_path(path, config) {
            FileCategory::Raster => plan.unlinked.push((path.clone(), SourceKind::Raster)),
            FileCategory::Vector => plan.unlinked.push((path.clone(), SourceKind::Vector)),
            // notify reports a moved-away directory as a single path
            FileCategory::ImageOther => plan.unlinked.push((path.clone(), SourceKind::Directory)),
            // a partial may have been removed; entries importing it must fail loudly
            FileCategory::Style => plan.style = true,
            category @ (FileCategory::Html | FileCategory::Script) => {
                plan.removed_other.push((path.clone(), category));
            }
            FileCategory::Config | FileCategory::Unknown => {}
        }
    }

    for list in [&mut plan.html, &mut plan.script, &mut plan.images] {
        list.sort();
    }
    plan.unlinked.sort();
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> KilnConfig {
        let mut config = KilnConfig::default();
        config.config_path = PathBuf::from("/site/kiln.toml");
        config.build.normalize(Path::new("/site"));
        config
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_classify_mixed_batch() {
        let plan = classify_changes(
            &paths(&[
                "/site/src/index.html",
                "/site/src/sass/_vars.scss",
                "/site/src/images/b.png",
                "/site/src/images/a.svg",
                "/site/src/unrelated.txt",
            ]),
            &paths(&["/site/src/images/hero.jpg", "/site/src/images/icon.svg", "/site/src/js/old.js"]),
            &config(),
        );

        assert!(!plan.config_changed);
        assert!(plan.style);
        assert_eq!(plan.html, paths(&["/site/src/index.html"]));
        assert_eq!(plan.images, paths(&["/site/src/images/a.svg", "/site/src/images/b.png"]));
        assert_eq!(
            plan.unlinked,
            vec![
                (PathBuf::from("/site/src/images/hero.jpg"), SourceKind::Raster),
                (PathBuf::from("/site/src/images/icon.svg"), SourceKind::Vector),
            ]
        );
        assert_eq!(plan.removed_other.len(), 1);
        assert!(!plan.is_style_only());
    }

    #[test]
    fn test_removed_image_directory() {
        let plan = classify_changes(
            &paths(&["/site/src/images/incoming"]),
            &paths(&["/site/src/images/gallery", "/site/src/gallery"]),
            &config(),
        );
        assert!(plan.images.is_empty());
        assert_eq!(
            plan.unlinked,
            vec![(PathBuf::from("/site/src/images/gallery"), SourceKind::Directory)]
        );
        assert!(plan.removed_other.is_empty());
    }

    #[test]
    fn test_style_only() {
        let plan = classify_changes(&paths(&["/site/src/sass/style.scss"]), &[], &config());
        assert!(plan.is_style_only());
        assert_eq!(plan.summary(), "sass");
    }

    #[test]
    fn test_config_change() {
        let plan = classify_changes(&paths(&["/site/kiln.toml"]), &[], &config());
        assert!(plan.config_changed);
        assert!(plan.is_config_only());
        assert!(!plan.is_empty());

        let mixed = classify_changes(&paths(&["/site/kiln.toml", "/site/src/a.html"]), &[], &config());
        assert!(!mixed.is_config_only());
    }

    #[test]
    fn test_unknown_only_is_empty() {
        let plan = classify_changes(&paths(&["/site/src/notes.md"]), &paths(&["/site/dist/a.jpg"]), &config());
        assert!(plan.is_empty());
    }
}
