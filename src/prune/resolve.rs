//! Source → destination path mapping. Pure, no I/O.

use std::path::{Component, Path, PathBuf};

use super::{PruneError, Result};
use crate::utils::path::clean;
use crate::utils::walk::extension_lower;

/// Extensions with a mapping between source and output trees.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "svg", "avif", "webp"];

/// Raster source extensions a derived file may originate from.
pub const RASTER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Derived-format extensions.
pub const DERIVED_EXTENSIONS: [&str; 2] = ["avif", "webp"];

/// How an image file relates to the source tree, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExt {
    /// `.jpg`, `.jpeg`, `.png`
    Raster,
    /// `.svg`
    Vector,
    /// `.avif`, `.webp` (only ever produced, never a source)
    Derived,
}

impl ImageExt {
    /// Classify by extension, case-insensitively.
    pub fn of(path: &Path) -> Option<Self> {
        match extension_lower(path)?.as_str() {
            "jpg" | "jpeg" | "png" => Some(Self::Raster),
            "svg" => Some(Self::Vector),
            "avif" | "webp" => Some(Self::Derived),
            _ => None,
        }
    }
}

/// Replace an image extension (any of [`IMAGE_EXTENSIONS`], case-insensitive).
///
/// `ext` may be given with or without its leading dot. Paths without a
/// known image extension come back unchanged, so applying the same
/// substitution twice is a no-op the second time.
pub fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let ext = ext.trim_start_matches('.');
    match extension_lower(path) {
        Some(current) if IMAGE_EXTENSIONS.contains(&current.as_str()) => path.with_extension(ext),
        _ => path.to_path_buf(),
    }
}

/// The pair of mirrored image roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRoots {
    source: PathBuf,
    dest: PathBuf,
}

impl ImageRoots {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: clean(&source.into()),
            dest: clean(&dest.into()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Path of `source_path` relative to the source root.
    ///
    /// Relative inputs are taken as already relative to the source root.
    pub fn relative_to_source(&self, source_path: &Path) -> Result<PathBuf> {
        relative_under(&self.source, source_path)
    }

    /// Path of `dest_path` relative to the destination root.
    pub fn relative_to_dest(&self, dest_path: &Path) -> Result<PathBuf> {
        relative_under(&self.dest, dest_path)
    }

    /// Map a source asset to its output path: same relative sub-path, destination root.
    pub fn resolve_destination(&self, source_path: &Path) -> Result<PathBuf> {
        Ok(self.dest.join(self.relative_to_source(source_path)?))
    }

    /// Source path at the same relative sub-path (used for existence probing).
    pub fn source_at(&self, rel: &Path) -> PathBuf {
        self.source.join(rel)
    }
}

/// Strip `root` from the lexically cleaned `path`, refusing anything that escapes it.
fn relative_under(root: &Path, path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        clean(path)
    } else {
        clean(&root.join(path))
    };

    match joined.strip_prefix(root) {
        Ok(rel)
            if !rel.as_os_str().is_empty()
                && rel.components().all(|c| matches!(c, Component::Normal(_))) =>
        {
            Ok(rel.to_path_buf())
        }
        _ => Err(PruneError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> ImageRoots {
        ImageRoots::new("/site/src/images", "/site/dist/assets/images")
    }

    #[test]
    fn test_resolve_destination_keeps_sub_path() {
        let dest = roots()
            .resolve_destination(Path::new("/site/src/images/top/hero.jpg"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/site/dist/assets/images/top/hero.jpg"));
    }

    #[test]
    fn test_resolve_destination_relative_input() {
        let dest = roots().resolve_destination(Path::new("icons/logo.svg")).unwrap();
        assert_eq!(dest, PathBuf::from("/site/dist/assets/images/icons/logo.svg"));
    }

    #[test]
    fn test_resolve_destination_normalizes_dots() {
        let dest = roots()
            .resolve_destination(Path::new("/site/src/images/a/../b/./c.png"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/site/dist/assets/images/b/c.png"));
    }

    #[test]
    fn test_escape_is_rejected() {
        let roots = roots();
        for path in [
            "/site/src/other/hero.jpg",
            "/site/src/images/../secret.png",
            "../outside.jpg",
            "/site/src/images",
        ] {
            let err = roots.resolve_destination(Path::new(path)).unwrap_err();
            assert!(matches!(err, PruneError::OutsideRoot { .. }), "{path}");
        }
    }

    #[test]
    fn test_sibling_prefix_is_not_inside() {
        // "/site/src/images2" shares a string prefix but not a path prefix
        let err = roots()
            .resolve_destination(Path::new("/site/src/images2/a.jpg"))
            .unwrap_err();
        assert!(matches!(err, PruneError::OutsideRoot { .. }));
    }

    #[test]
    fn test_with_extension() {
        let p = Path::new("/d/top/hero.jpg");
        assert_eq!(with_extension(p, ".avif"), PathBuf::from("/d/top/hero.avif"));
        assert_eq!(with_extension(p, "webp"), PathBuf::from("/d/top/hero.webp"));
        assert_eq!(
            with_extension(Path::new("/d/PHOTO.JPEG"), ".avif"),
            PathBuf::from("/d/PHOTO.avif")
        );
    }

    #[test]
    fn test_with_extension_unknown_unchanged() {
        assert_eq!(with_extension(Path::new("/d/a.gif"), ".avif"), PathBuf::from("/d/a.gif"));
        assert_eq!(with_extension(Path::new("/d/noext"), ".avif"), PathBuf::from("/d/noext"));
    }

    #[test]
    fn test_with_extension_idempotent() {
        let roots = roots();
        for src in ["/site/src/images/a.png", "/site/src/images/x/y.JPG", "/site/src/images/i.svg"] {
            let dest = roots.resolve_destination(Path::new(src)).unwrap();
            for ext in [".avif", ".webp", ".png"] {
                let once = with_extension(&dest, ext);
                assert_eq!(with_extension(&once, ext), once);
            }
        }
    }

    #[test]
    fn test_dotted_stem() {
        assert_eq!(
            with_extension(Path::new("/d/hero.v2.png"), ".avif"),
            PathBuf::from("/d/hero.v2.avif")
        );
    }

    #[test]
    fn test_image_ext() {
        assert_eq!(ImageExt::of(Path::new("a.JPG")), Some(ImageExt::Raster));
        assert_eq!(ImageExt::of(Path::new("a.svg")), Some(ImageExt::Vector));
        assert_eq!(ImageExt::of(Path::new("a.webp")), Some(ImageExt::Derived));
        assert_eq!(ImageExt::of(Path::new("a.gif")), None);
    }
}
