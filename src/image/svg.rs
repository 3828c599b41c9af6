//! SVG normalization with usvg.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;

use crate::debug;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

// ASCII whitespace only: perl classes need regex's unicode tables.
static ROOT_TAG: Pattern = LazyLock::new(|| Regex::new(r"<svg(?:[ \t\r\n][^>]*)?/?>"));
static WIDTH: Pattern = LazyLock::new(|| Regex::new(r#"[ \t\r\n]width="([^"]*)""#));
static HEIGHT: Pattern = LazyLock::new(|| Regex::new(r#"[ \t\r\n]height="([^"]*)""#));
static TEXT: Pattern = LazyLock::new(|| Regex::new(r"<text[ \t\r\n/>]"));

fn pattern(re: &'static Pattern) -> Result<&'static Regex> {
    match &**re {
        Ok(regex) => Ok(regex),
        Err(e) => Err(anyhow!("invalid svg pattern: {e}")),
    }
}

/// Parse, normalize and re-serialize an SVG document without indentation.
///
/// Documents containing `<text>` are returned as they are, since usvg is
/// built without font support and would drop the text.
pub fn optimize(content: &[u8], remove_dimensions: bool) -> Result<Vec<u8>> {
    let raw = std::str::from_utf8(content).context("SVG is not valid UTF-8")?;
    if pattern(&TEXT)?.is_match(raw) {
        debug!("svg"; "contains <text>, kept as is");
        return Ok(content.to_vec());
    }

    let tree = usvg::Tree::from_data(content, &usvg::Options::default())
        .context("failed to parse SVG")?;
    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    let mut svg = tree.to_string(&write_options);

    if remove_dimensions {
        svg = strip_root_dimensions(&svg)?;
    }
    Ok(svg.into_bytes())
}

/// Drop `width`/`height` from the root element, keeping its aspect ratio
/// through a `viewBox` built from them when none exists.
pub fn strip_root_dimensions(svg: &str) -> Result<String> {
    let Some(root) = pattern(&ROOT_TAG)?.find(svg) else {
        return Ok(svg.to_string());
    };
    let tag = root.as_str();
    let (width_re, height_re) = (pattern(&WIDTH)?, pattern(&HEIGHT)?);

    let width = width_re.captures(tag).map(|c| c[1].to_string());
    let height = height_re.captures(tag).map(|c| c[1].to_string());

    let mut new_tag = width_re.replace(tag, "").into_owned();
    new_tag = height_re.replace(&new_tag, "").into_owned();

    if !new_tag.contains("viewBox=")
        && let (Some(w), Some(h)) = (width.as_deref().and_then(number), height.as_deref().and_then(number))
    {
        new_tag = new_tag.replacen("<svg", &format!(r#"<svg viewBox="0 0 {w} {h}""#), 1);
    }

    Ok(format!("{}{}{}", &svg[..root.start()], new_tag, &svg[root.end()..]))
}

/// Unitless or `px` length as a plain number.
fn number(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}

pub fn optimize_file(source: &Path, output: &Path, remove_dimensions: bool) -> Result<()> {
    let content = fs::read(source).with_context(|| format!("failed to read {}", source.display()))?;
    let optimized =
        optimize(&content, remove_dimensions).with_context(|| format!("in {}", source.display()))?;
    super::write_output(output, &optimized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24">
    <!-- comment -->
    <rect x="2" y="2" width="20" height="20" fill="red"/>
</svg>
"#;

    #[test]
    fn test_optimize_removes_indentation_and_comments() {
        let out = String::from_utf8(optimize(ICON.as_bytes(), false).unwrap()).unwrap();
        assert!(!out.contains("comment"));
        assert!(!out.contains("\n    "));
        assert!(out.contains(r#"width="24""#));
    }

    #[test]
    fn test_optimize_removes_root_dimensions() {
        let out = String::from_utf8(optimize(ICON.as_bytes(), true).unwrap()).unwrap();
        let root = pattern(&ROOT_TAG).unwrap().find(&out).unwrap().as_str();
        assert!(!root.contains("width="));
        assert!(!root.contains(" height="));
        assert!(root.contains("viewBox="));
    }

    #[test]
    fn test_strip_keeps_existing_viewbox() {
        let svg = r#"<svg width="10" height="5" viewBox="0 0 20 10"><rect width="3" height="3"/></svg>"#;
        assert_eq!(
            strip_root_dimensions(svg).unwrap(),
            r#"<svg viewBox="0 0 20 10"><rect width="3" height="3"/></svg>"#
        );
    }

    #[test]
    fn test_strip_synthesizes_viewbox() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="8"/>"#;
        assert_eq!(
            strip_root_dimensions(svg).unwrap(),
            r#"<svg viewBox="0 0 16 8" xmlns="http://www.w3.org/2000/svg"/>"#
        );
    }

    #[test]
    fn test_patterns_compile() {
        for re in [&ROOT_TAG, &WIDTH, &HEIGHT, &TEXT] {
            assert!(pattern(re).is_ok());
        }
    }

    #[test]
    fn test_root_tag_ignores_similar_names() {
        let svg = "<svgx width=\"1\"/><svg\n  width=\"2\" height=\"3\"><textPath/></svg>";
        assert_eq!(
            strip_root_dimensions(svg).unwrap(),
            "<svgx width=\"1\"/><svg viewBox=\"0 0 2 3\"\n ><textPath/></svg>"
        );
        assert!(!pattern(&TEXT).unwrap().is_match(svg));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>hi</text></svg>"#;
        assert_eq!(optimize(svg.as_bytes(), true).unwrap(), svg.as_bytes());
    }

    #[test]
    fn test_invalid_svg() {
        assert!(optimize(b"<svg", false).is_err());
    }
}
