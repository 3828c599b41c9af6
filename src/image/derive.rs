//! Derived AVIF/WebP siblings of raster sources.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use super::raster::decode;
use crate::config::DerivedFormat;
use crate::config::section::ImagesConfig;

/// Encode `img` as AVIF.
pub fn encode_avif(img: &DynamicImage, quality: u8, speed: u8) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    let pixels: Vec<_> = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|c| ravif::RGBA8::new(c[0], c[1], c[2], c[3]))
        .collect();

    // ravif has no chroma subsampling option; output is 4:4:4
    let encoded = ravif::Encoder::new()
        .with_quality(f32::from(quality))
        .with_speed(speed)
        .encode_rgba(ravif::Img::new(pixels.as_slice(), w, h))
        .context("avif encoding failed")?;
    Ok(encoded.avif_file)
}

/// Encode `img` as lossless WebP.
pub fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let mut buf = Vec::new();
    WebPEncoder::new_lossless(Cursor::new(&mut buf)).write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

/// Write the configured derived format of `source` to `output`.
pub fn derive(source: &Path, output: &Path, images: &ImagesConfig) -> Result<()> {
    let img = decode(source)?;
    let bytes = match images.derived {
        DerivedFormat::Avif => encode_avif(&img, images.avif_quality, images.avif_speed),
        DerivedFormat::Webp => encode_webp(&img),
    }
    .with_context(|| format!("failed to derive {}", output.display()))?;
    super::write_output(output, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 128])
            }
        }))
    }

    #[test]
    fn test_encode_avif_has_ftyp() {
        let avif = encode_avif(&checker(), 70, 10).unwrap();
        assert_eq!(&avif[4..8], b"ftyp");
    }

    #[test]
    fn test_encode_webp_roundtrips_pixels() {
        let img = checker();
        let webp = encode_webp(&img).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        let decoded = image::load_from_memory(&webp).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_derive_writes_configured_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        checker().save(&src).unwrap();

        let images = ImagesConfig {
            derived: DerivedFormat::Webp,
            ..ImagesConfig::default()
        };
        let out = dir.path().join("out/a.webp");
        derive(&src, &out, &images).unwrap();
        assert_eq!(&std::fs::read(&out).unwrap()[8..12], b"WEBP");
    }
}
