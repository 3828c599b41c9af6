//! HTML and JavaScript mirroring from `src` into `dist`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::{TransformStats, minify::minify_js, mirror_path};
use crate::config::BuildConfig;
use crate::freshness::is_output_fresh;
use crate::utils::walk;
use crate::{debug, log};

/// Every `*.html` under `src`, skipping `html_exclude` directories.
pub fn html_sources(build: &BuildConfig) -> Result<Vec<PathBuf>> {
    walk::files_excluding(&build.src, &build.html_exclude, is_html)
        .with_context(|| format!("failed to scan {}", build.src.display()))
}

/// Every file under the js source directory.
pub fn js_sources(build: &BuildConfig) -> Result<Vec<PathBuf>> {
    let root = build.js_source();
    walk::files(&root, |_| true).with_context(|| format!("failed to scan {}", root.display()))
}

pub fn is_html(path: &Path) -> bool {
    walk::extension_lower(path).is_some_and(|e| e == "html" || e == "htm")
}

/// Mirror html files into `dist`.
pub fn copy_html(build: &BuildConfig, files: &[PathBuf], force: bool) -> Result<TransformStats> {
    mirror_all(files, force, |source| {
        let output = mirror_path(source, &build.src, &build.dist)?;
        Ok((output, None))
    })
}

/// Mirror js files, minifying `.js` sources when configured.
pub fn copy_js(build: &BuildConfig, files: &[PathBuf], force: bool) -> Result<TransformStats> {
    let (src, dest) = (build.js_source(), build.js_output());
    mirror_all(files, force, |source| {
        let output = mirror_path(source, &src, &dest)?;
        let minify = build.js.minify && is_minifiable_js(source);
        Ok((output, minify.then_some(minify_js as Rewrite)))
    })
}

type Rewrite = fn(&str) -> Result<String>;

/// Copy (or rewrite) each file to the path `plan` gives it.
///
/// Every file is attempted; failures are logged and the first one returned.
fn mirror_all<F>(files: &[PathBuf], force: bool, plan: F) -> Result<TransformStats>
where
    F: Fn(&Path) -> Result<(PathBuf, Option<Rewrite>)> + Sync,
{
    let results: Vec<Result<bool>> = files
        .par_iter()
        .map(|source| {
            let (output, rewrite) = plan(source)?;
            mirror_one(source, &output, rewrite, force)
                .with_context(|| format!("failed to write {}", output.display()))
        })
        .collect();

    let mut stats = TransformStats::default();
    let mut first_err = None;
    for result in results {
        match result {
            Ok(true) => stats.written += 1,
            Ok(false) => stats.skipped += 1,
            Err(e) => {
                log!("error"; "{e:#}");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}

/// Returns whether anything was written.
fn mirror_one(source: &Path, output: &Path, rewrite: Option<Rewrite>, force: bool) -> Result<bool> {
    if !force && is_output_fresh(source, output) {
        return Ok(false);
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    match rewrite {
        Some(rewrite) => {
            let content = fs::read_to_string(source)?;
            let content = rewrite(&content)
                .with_context(|| format!("failed to minify {}", source.display()))?;
            fs::write(output, content)?;
        }
        None => {
            fs::copy(source, output)?;
        }
    }
    debug!("copy"; "{}", output.display());
    Ok(true)
}

/// `.js` that is not already a `.min.js`.
fn is_minifiable_js(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    walk::extension_lower(path).is_some_and(|e| e == "js") && !stem.ends_with(".min")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_in(dir: &Path) -> BuildConfig {
        let mut build = BuildConfig::default();
        build.normalize(dir);
        build
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_html_sources_skip_excluded() {
        let dir = TempDir::new().unwrap();
        let build = build_in(dir.path());
        write(&build.src.join("index.html"), "<p>hi</p>");
        write(&build.src.join("about/index.html"), "<p>about</p>");
        write(&build.src.join("node_modules/pkg/readme.html"), "x");
        write(&build.src.join("js/app.js"), "x");

        let files = html_sources(&build).unwrap();
        assert_eq!(
            files,
            vec![build.src.join("about/index.html"), build.src.join("index.html")]
        );
    }

    #[test]
    fn test_copy_html_then_skip_fresh() {
        let dir = TempDir::new().unwrap();
        let build = build_in(dir.path());
        write(&build.src.join("a/index.html"), "<p>a</p>");
        let files = html_sources(&build).unwrap();

        let first = copy_html(&build, &files, false).unwrap();
        assert_eq!(first.written, 1);
        assert_eq!(fs::read_to_string(build.dist.join("a/index.html")).unwrap(), "<p>a</p>");

        let second = copy_html(&build, &files, false).unwrap();
        assert_eq!(second, TransformStats { written: 0, skipped: 1 });

        let forced = copy_html(&build, &files, true).unwrap();
        assert_eq!(forced.written, 1);
    }

    #[test]
    fn test_copy_js_minify() {
        let dir = TempDir::new().unwrap();
        let mut build = build_in(dir.path());
        build.js.minify = true;
        let src = build.js_source();
        write(&src.join("main.js"), "const answer = 40 + 2;\nconsole.log(answer);\n");
        write(&src.join("vendor.min.js"), "keep  as  is");
        write(&src.join("data.json"), "{ \"a\": 1 }");

        let files = js_sources(&build).unwrap();
        let stats = copy_js(&build, &files, false).unwrap();
        assert_eq!(stats.written, 3);

        let out = build.js_output();
        let main = fs::read_to_string(out.join("main.js")).unwrap();
        assert!(!main.contains('\n') || main.trim_end().lines().count() == 1);
        assert!(main.contains("console.log"));
        assert_eq!(fs::read_to_string(out.join("vendor.min.js")).unwrap(), "keep  as  is");
        assert_eq!(fs::read_to_string(out.join("data.json")).unwrap(), "{ \"a\": 1 }");
    }

    #[test]
    fn test_copy_js_bad_syntax_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut build = build_in(dir.path());
        build.js.minify = true;
        write(&build.js_source().join("broken.js"), "function (");
        write(&build.js_source().join("ok.js"), "let a = 1;");

        let files = js_sources(&build).unwrap();
        assert!(copy_js(&build, &files, false).is_err());
        assert!(build.js_output().join("ok.js").exists());
    }

    #[test]
    fn test_is_minifiable_js() {
        assert!(is_minifiable_js(Path::new("a.js")));
        assert!(!is_minifiable_js(Path::new("a.min.js")));
        assert!(!is_minifiable_js(Path::new("a.mjs")));
    }
}
