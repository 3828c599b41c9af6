//! Sass compilation through the external `sass` CLI, then in-process
//! prefixing and minification with lightningcss.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use lightningcss::targets::{Browsers, Targets};
use rayon::prelude::*;

use super::{TransformStats, minify::process_css, mirror_path};
use crate::config::BuildConfig;
use crate::utils::exec::{Cmd, FilterRule};
use crate::utils::walk;
use crate::{debug, log};

/// Noise dart-sass prints on stderr for every run.
static SASS_FILTER: FilterRule = FilterRule::new(&["Deprecation", "More info", "Recommendation"]);

/// Resolve browserslist queries into prefixing targets.
pub fn parse_targets(queries: &[String]) -> Result<Targets> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }
    let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
        .map_err(|e| anyhow!("invalid browserslist query: {e}"))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

/// `.scss`/`.sass` files that are not partials.
pub fn is_entry(path: &Path) -> bool {
    let is_sass = walk::extension_lower(path).is_some_and(|e| e == "scss" || e == "sass");
    let is_partial = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    is_sass && !is_partial
}

/// Sass entry points (non-partials) under the sass directory.
pub fn sass_entries(build: &BuildConfig) -> Result<Vec<PathBuf>> {
    let root = build.sass_source();
    walk::files(&root, is_entry).with_context(|| format!("failed to scan {}", root.display()))
}

/// Where `entry` compiles to.
pub fn css_output(build: &BuildConfig, entry: &Path) -> Result<PathBuf> {
    Ok(mirror_path(entry, &build.sass_source(), &build.sass_output())?.with_extension("css"))
}

/// Compile every entry point.
///
/// A partial may be imported from any entry, so no freshness check is made.
/// All entries are attempted; the first failure is returned.
pub fn compile_all(build: &BuildConfig) -> Result<TransformStats> {
    let entries = sass_entries(build)?;
    let targets = parse_targets(&build.sass.browsers)?;

    let results: Vec<Result<()>> = entries
        .par_iter()
        .map(|entry| compile_entry(build, entry, targets))
        .collect();

    let mut stats = TransformStats::default();
    let mut first_err = None;
    for result in results {
        match result {
            Ok(()) => stats.written += 1,
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => {
            log!("sass"; "compiled {}", crate::utils::plural::plural_count(stats.written, "stylesheet"));
            Ok(stats)
        }
    }
}

/// Compile one entry point to its mirrored `.css` path.
pub fn compile_entry(build: &BuildConfig, entry: &Path, targets: Targets) -> Result<()> {
    let output = css_output(build, entry)?;
    let load_path = build.sass_source();

    let compiled = Cmd::from_slice(&build.sass.command)
        .arg("--no-source-map")
        .arg(format!("--load-path={}", load_path.display()))
        .arg(entry)
        .filter(&SASS_FILTER)
        .run()
        .with_context(|| format!("failed to compile {}", entry.display()))?;

    let css = String::from_utf8(compiled.stdout)
        .with_context(|| format!("sass produced non-UTF-8 output for {}", entry.display()))?;
    let name = entry.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let css = process_css(&css, name, targets, build.sass.minify)
        .with_context(|| format!("failed to post-process {}", entry.display()))?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, css).with_context(|| format!("failed to write {}", output.display()))?;
    debug!("sass"; "{}", output.display());
    Ok(())
}
