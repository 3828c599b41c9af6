use std::fmt;

use anyhow::Result;

use super::BuildOptions;
use crate::asset::{TransformStats, copy, style};
use crate::config::{BuildConfig, KilnConfig};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// What one full build wrote.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformSet {
    pub html: TransformStats,
    pub js: TransformStats,
    pub sass: TransformStats,
    pub images: usize,
}

impl fmt::Display for TransformSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} html, {} js, {}, {}",
            self.html.written,
            self.js.written,
            plural_count(self.sass.written, "stylesheet"),
            plural_count(self.images, "image job"),
        )
    }
}

/// html + js on one side, sass + images on the other.
///
/// Both halves always run to completion; the first error is returned.
pub(super) fn run_all(config: &KilnConfig, options: BuildOptions) -> Result<TransformSet> {
    let build = &config.build;
    let force = options.force;

    let ((html, js), (sass, images)) = rayon::join(
        || rayon::join(|| html(build, force), || js(build, force)),
        || rayon::join(|| style::compile_all(build), || run_images(build, force, options.progress)),
    );

    Ok(TransformSet {
        html: html?,
        js: js?,
        sass: sass?,
        images: images?,
    })
}

fn html(build: &BuildConfig, force: bool) -> Result<TransformStats> {
    let files = copy::html_sources(build)?;
    let stats = copy::copy_html(build, &files, force)?;
    debug!("html"; "{} copied, {} up to date", stats.written, stats.skipped);
    Ok(stats)
}

fn js(build: &BuildConfig, force: bool) -> Result<TransformStats> {
    let files = copy::js_sources(build)?;
    let stats = copy::copy_js(build, &files, force)?;
    debug!("js"; "{} copied, {} up to date", stats.written, stats.skipped);
    Ok(stats)
}

/// Compress, derive and optimize every stale image. Returns the jobs run.
pub fn run_images(build: &BuildConfig, force: bool, progress: bool) -> Result<usize> {
    let roots = build.image_roots();
    let sources = crate::image::sources(&roots)?;
    let jobs = crate::image::plan(&roots, &build.images, &sources, force)?;

    if jobs.is_empty() {
        debug!("images"; "{} up to date", plural_count(sources.len(), "source"));
        return Ok(0);
    }

    let done = crate::image::run(&jobs, &build.images, progress)?;
    log!("images"; "{} from {}", plural_count(done, "output"), plural_count(sources.len(), "source"));
    Ok(done)
}
