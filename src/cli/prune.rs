//! Image output maintenance: `kiln clean-images` and `kiln prune-images`.
//!
//! Both run on a current-thread tokio runtime: one cooperative timeline,
//! with the file deletions overlapping as async I/O.

use std::future::Future;

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::prune::{self, PruneReport};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Delete every jpg/png output except `keep` (or `images.keep` when empty).
pub fn clean_images(config: &KilnConfig, keep: &[String]) -> Result<PruneReport> {
    let keep = if keep.is_empty() {
        &config.build.images.keep
    } else {
        keep
    };
    let dest = config.build.image_roots().dest().to_path_buf();

    let report = block_on(prune::cleanup_except(&dest, keep))?
        .with_context(|| format!("failed to clean {}", dest.display()))?;
    print_report("clean", config, &report, "image");
    Ok(report)
}

/// Delete outputs whose source image is gone.
pub fn prune_images(config: &KilnConfig) -> Result<PruneReport> {
    let roots = config.build.image_roots();

    let report = block_on(prune::reconcile_orphans(&roots))?
        .with_context(|| format!("failed to prune {}", roots.dest().display()))?;
    print_report("prune", config, &report, "orphan");
    Ok(report)
}

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    Ok(rt.block_on(future))
}

fn print_report(module: &str, config: &KilnConfig, report: &PruneReport, noun: &str) {
    for path in &report.removed {
        debug!(module; "removed {}", config.root_relative(path).display());
    }
    log!(
        module;
        "removed {} ({} scanned)",
        plural_count(report.removed.len(), noun),
        report.scanned
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, KilnConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = KilnConfig::default();
        config.root = dir.path().to_path_buf();
        config.build.normalize(dir.path());
        (dir, config)
    }

    fn touch(path: &std::path::Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_clean_images_uses_config_keep_list() {
        let (_dir, config) = site();
        let dest = config.build.image_roots().dest().to_path_buf();
        touch(&dest.join("sora.jpg"));
        touch(&dest.join("a.png"));
        touch(&dest.join("a.avif"));

        let report = clean_images(&config, &[]).unwrap();
        assert_eq!(report.removed, vec![dest.join("a.png")]);
        assert!(dest.join("sora.jpg").exists());
        assert!(dest.join("a.avif").exists());
    }

    #[test]
    fn test_clean_images_cli_keep_overrides() {
        let (_dir, config) = site();
        let dest = config.build.image_roots().dest().to_path_buf();
        touch(&dest.join("sora.jpg"));
        touch(&dest.join("top/b.jpg"));

        let report = clean_images(&config, &["top/b.jpg".to_string()]).unwrap();
        assert_eq!(report.removed, vec![dest.join("sora.jpg")]);
    }

    #[test]
    fn test_prune_images_removes_orphans() {
        let (_dir, config) = site();
        let roots = config.build.image_roots();
        touch(&roots.source().join("kept.png"));
        touch(&roots.dest().join("kept.png"));
        touch(&roots.dest().join("kept.webp"));
        touch(&roots.dest().join("gone.jpg"));
        touch(&roots.dest().join("gone.avif"));

        let report = prune_images(&config).unwrap();
        assert_eq!(report.scanned, 4);
        assert_eq!(
            report.removed,
            vec![roots.dest().join("gone.avif"), roots.dest().join("gone.jpg")]
        );
    }
}
