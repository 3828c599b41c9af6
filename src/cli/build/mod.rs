//! Site building orchestration.
//!
//! Build phases:
//! - **Clean** - delete `dist` (unless `--no-clean`)
//! - **Transform** - html, sass, js and images in parallel
//! - **Report** - per-transform counts, first error wins

mod pipeline;

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::log;

pub use pipeline::run_images;

/// How a full build treats existing output.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Delete `dist` first.
    pub clean: bool,
    /// Rewrite outputs even when they are newer than their sources.
    pub force: bool,
    /// Show the image progress line.
    pub progress: bool,
}

impl BuildOptions {
    /// `kiln build`: everything from scratch unless `--no-clean`.
    pub fn full(clean: bool) -> Self {
        Self {
            clean,
            force: clean,
            progress: true,
        }
    }

    /// First build of `kiln serve`: only stale outputs.
    pub fn incremental() -> Self {
        Self {
            clean: false,
            force: false,
            progress: true,
        }
    }

    /// Config changed while watching: rewrite everything, quietly.
    pub fn forced() -> Self {
        Self {
            clean: false,
            force: true,
            progress: false,
        }
    }
}

/// Run every transform over the whole source tree.
pub fn build_site(config: &KilnConfig, options: BuildOptions) -> Result<()> {
    let start = Instant::now();

    if options.clean {
        clean_dist(config)?;
    }

    let stats = pipeline::run_all(config, options)?;
    log!("build"; "{} in {:.2?}", stats, start.elapsed());
    Ok(())
}

/// `kiln clean`: remove the output root.
pub fn clean_dist(config: &KilnConfig) -> Result<()> {
    let dist = &config.build.dist;
    match fs::remove_dir_all(dist) {
        Ok(()) => {
            log!("clean"; "removed {}", config.root_relative(dist).display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            crate::debug!("clean"; "{} does not exist", dist.display());
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", dist.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn site() -> (TempDir, KilnConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = KilnConfig::default();
        config.root = dir.path().to_path_buf();
        config.build.normalize(dir.path());
        (dir, config)
    }

    #[test]
    fn test_clean_dist_missing_is_ok() {
        let (_dir, config) = site();
        clean_dist(&config).unwrap();
    }

    #[test]
    fn test_clean_dist_removes_tree() {
        let (_dir, config) = site();
        fs::create_dir_all(config.build.dist.join("assets/images")).unwrap();
        fs::write(config.build.dist.join("index.html"), "x").unwrap();

        clean_dist(&config).unwrap();
        assert!(!config.build.dist.exists());
    }

    #[test]
    fn test_build_copies_html_and_js() {
        let (_dir, mut config) = site();
        config.build.sass.command = vec!["kiln-test-no-such-sass".into()];
        let src = config.build.src.clone();
        fs::create_dir_all(src.join("blog")).unwrap();
        fs::create_dir_all(src.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(config.build.js_source()).unwrap();
        fs::write(src.join("index.html"), "<p>home</p>").unwrap();
        fs::write(src.join("blog/post.html"), "<p>post</p>").unwrap();
        fs::write(src.join("node_modules/pkg/readme.html"), "x").unwrap();
        fs::write(config.build.js_source().join("app.js"), "let a = 1;").unwrap();

        build_site(&config, BuildOptions { clean: true, force: true, progress: false }).unwrap();

        let dist = &config.build.dist;
        assert!(dist.join("index.html").is_file());
        assert!(dist.join("blog/post.html").is_file());
        assert!(!dist.join("node_modules").exists());
        assert!(config.build.js_output().join("app.js").is_file());
        assert!(!Path::new(&dist.join("assets/css")).exists());
    }
}
