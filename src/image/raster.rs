//! Re-encoding of JPEG and PNG sources into smaller files of the same format.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};

use crate::utils::walk::extension_lower;

/// Decode any supported raster file, trusting content over extension.
pub fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))
}

/// Encode `img` in the format named by `output`'s extension.
pub fn encode(img: &DynamicImage, ext: &str, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let (w, h) = (img.width(), img.height());
    match ext {
        "jpg" | "jpeg" => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), jpeg_quality).write_image(
                rgb.as_raw(),
                w,
                h,
                ExtendedColorType::Rgb8,
            )?;
        }
        "png" => {
            PngEncoder::new_with_quality(
                Cursor::new(&mut buf),
                CompressionType::Best,
                FilterType::Adaptive,
            )
            .write_image(img.as_bytes(), w, h, img.color().into())?;
        }
        other => bail!("unsupported raster format `{other}`"),
    }
    Ok(buf)
}

/// Compress `source` into `output`.
///
/// When re-encoding does not shrink the file, the source bytes are copied
/// as they are.
pub fn compress(source: &Path, output: &Path, jpeg_quality: u8) -> Result<()> {
    let ext = extension_lower(source).unwrap_or_default();
    let original = fs::read(source).with_context(|| format!("failed to read {}", source.display()))?;
    let img = decode(source)?;
    let encoded = encode(&img, &ext, jpeg_quality)?;

    let bytes = if encoded.len() < original.len() {
        encoded
    } else {
        original
    };
    super::write_output(output, &bytes)
}
