//! Image transforms over the image source root.
//!
//! - [`raster`]: jpg/png recompression into the mirrored destination
//! - [`derive`]: AVIF/WebP sibling of every raster source
//! - [`svg`]: usvg normalization
//!
//! All jobs for a batch run on rayon. Every file is attempted; failures are
//! logged one by one and the first is returned once the batch is done.

pub mod derive;
pub mod raster;
pub mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::section::ImagesConfig;
use crate::freshness::is_output_fresh;
use crate::logger::ProgressLine;
use crate::prune::{ImageExt, ImageRoots, with_extension};
use crate::utils::walk;
use crate::{debug, log};

/// One unit of image work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageJob {
    Compress { source: PathBuf, output: PathBuf },
    Derive { source: PathBuf, output: PathBuf },
    Svg { source: PathBuf, output: PathBuf },
}

impl ImageJob {
    fn name(&self) -> &'static str {
        match self {
            Self::Compress { .. } => "compress",
            Self::Derive { .. } => "derive",
            Self::Svg { .. } => "svg",
        }
    }

    fn paths(&self) -> (&Path, &Path) {
        match self {
            Self::Compress { source, output }
            | Self::Derive { source, output }
            | Self::Svg { source, output } => (source, output),
        }
    }

    fn run(&self, images: &ImagesConfig) -> Result<()> {
        match self {
            Self::Compress { source, output } => raster::compress(source, output, images.jpeg_quality),
            Self::Derive { source, output } => derive::derive(source, output, images),
            Self::Svg { source, output } => svg::optimize_file(source, output, images.svg_remove_dimensions),
        }
    }
}

/// Every jpg/jpeg/png/svg under the image source root.
pub fn sources(roots: &ImageRoots) -> Result<Vec<PathBuf>> {
    walk::files(roots.source(), |p| {
        matches!(ImageExt::of(p), Some(ImageExt::Raster | ImageExt::Vector))
    })
    .with_context(|| format!("failed to scan {}", roots.source().display()))
}

/// Jobs for `files`: raster sources get compress + derive, SVGs get optimize.
///
/// Unless `force` is set, jobs whose output is newer than the source are dropped.
pub fn plan(
    roots: &ImageRoots,
    images: &ImagesConfig,
    files: &[PathBuf],
    force: bool,
) -> Result<Vec<ImageJob>> {
    let mut jobs = Vec::new();
    for source in files {
        let output = roots.resolve_destination(source)?;
        match ImageExt::of(source) {
            Some(ImageExt::Raster) => {
                let derived = with_extension(&output, images.derived.extension());
                jobs.push(ImageJob::Compress {
                    source: source.clone(),
                    output,
                });
                jobs.push(ImageJob::Derive {
                    source: source.clone(),
                    output: derived,
                });
            }
            Some(ImageExt::Vector) => jobs.push(ImageJob::Svg {
                source: source.clone(),
                output,
            }),
            _ => {}
        }
    }

    if !force {
        jobs.retain(|job| {
            let (source, output) = job.paths();
            !is_output_fresh(source, output)
        });
    }
    Ok(jobs)
}

/// Run jobs in parallel, with a progress line when `progress` is set.
pub fn run(jobs: &[ImageJob], images: &ImagesConfig, progress: bool) -> Result<usize> {
    if jobs.is_empty() {
        return Ok(0);
    }

    let count = |name: &str| jobs.iter().filter(|j| j.name() == name).count();
    let bar = progress.then(|| {
        ProgressLine::new(
            "images",
            &[("compress", count("compress")), ("derive", count("derive")), ("svg", count("svg"))],
        )
    });

    let results: Vec<Result<()>> = jobs
        .par_iter()
        .map(|job| {
            let result = job.run(images);
            if let Some(bar) = &bar {
                bar.inc(job.name());
            }
            result
        })
        .collect();

    if let Some(bar) = bar {
        bar.finish();
    }

    let mut first_err = None;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(()) => debug!("images"; "{} {}", job.name(), job.paths().1.display()),
            Err(e) => {
                log!("error"; "{e:#}");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(jobs.len()),
    }
}

/// Write an encoded image, creating parent directories.
pub(crate) fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, bytes).with_context(|| format!("failed to write {}", output.display()))
}
