//! Per-format encoders over RGBA surfaces.
//!
//! JPEG and PNG use the `image` crate's encoders. WebP goes through libwebp
//! when the `lossy-webp` feature is on, otherwise through the `image` crate's
//! lossless encoder, which ignores quality.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{check_dimensions, EncodeError};
use crate::format::{OutputFormat, Quality};

fn check_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    check_dimensions(width, height)?;

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode an RGBA surface in the given format.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(pixels, width, height, quality),
        OutputFormat::Png => encode_png(pixels, width, height),
        OutputFormat::Webp => encode_webp(pixels, width, height, quality),
    }
}

/// Encode RGBA pixel data to JPEG bytes.
///
/// JPEG has no alpha channel; pixels are composited onto black first, the
/// same result a 2D canvas gives when exporting JPEG.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    check_rgba(pixels, width, height)?;

    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as u16;
            [
                (px[0] as u16 * a / 255) as u8,
                (px[1] as u16 * a / 255) as u8,
                (px[2] as u16 * a / 255) as u8,
            ]
        })
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.as_jpeg_quality())
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodeFailure(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixel data to PNG bytes. Lossless; there is no quality knob.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    check_rgba(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodeFailure(format!("PNG encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixel data to lossy WebP bytes at `quality`.
#[cfg(feature = "lossy-webp")]
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    check_rgba(pixels, width, height)?;

    let encoder = webp::Encoder::from_rgba(pixels, width, height);
    let mut config = webp::WebPConfig::new()
        .map_err(|_| EncodeError::EncodeFailure("failed to create WebPConfig".to_string()))?;
    config.quality = quality.value() * 100.0;

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::EncodeFailure(format!("WebP encoding failed: {:?}", e)))?;

    Ok(encoded.to_vec())
}

/// Encode RGBA pixel data to lossless WebP bytes. `quality` is ignored.
#[cfg(not(feature = "lossy-webp"))]
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    _quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    use image::codecs::webp::WebPEncoder;

    check_rgba(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodeFailure(format!("WebP encoding failed: {}", e)))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn pixels_strategy() -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let size = (w * h * 4) as usize;
            (Just(w), Just(h), prop::collection::vec(any::<u8>(), size..=size))
        })
    }

    proptest! {
        /// Property: PNG output decodes back to exactly the input pixels.
        #[test]
        fn prop_png_is_lossless((width, height, pixels) in pixels_strategy(), q in 0.0f32..=1.0) {
            let png = encode_png(&pixels, width, height).unwrap();
            let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
            prop_assert_eq!(decoded.dimensions(), (width, height));
            prop_assert_eq!(decoded.into_raw(), pixels.clone());

            // The quality setting makes no difference.
            let via_dispatch = encode_rgba(&pixels, width, height, OutputFormat::Png, Quality::new(q)).unwrap();
            prop_assert_eq!(via_dispatch, png);
        }

        /// Property: every format produces non-empty output for valid input.
        #[test]
        fn prop_output_is_non_empty((width, height, pixels) in pixels_strategy(), percent in 10u8..=100) {
            for format in OutputFormat::ALL {
                let bytes = encode_rgba(&pixels, width, height, format, Quality::from_percent(percent)).unwrap();
                prop_assert!(!bytes.is_empty());
            }
        }

        /// Property: JPEG encoding is deterministic.
        #[test]
        fn prop_jpeg_deterministic((width, height, pixels) in pixels_strategy(), percent in 10u8..=100) {
            let quality = Quality::from_percent(percent);
            let a = encode_jpeg(&pixels, width, height, quality).unwrap();
            let b = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
