//! Native pipeline WASM bindings.
//!
//! Decoding and encoding done inside WASM with the core crate instead of the
//! browser's canvas. Useful where no DOM is available (Web Workers) or where
//! the output must not depend on the browser's codecs.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_image } from '@resizer/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const jpeg = encode_image(image, 960, 540, 'jpeg', 0.8);
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use crate::types::JsSourceImage;
use resizer_core::decode;
use resizer_core::encode::{self, TargetSpec};
use resizer_core::{Dimensions, OutputFormat, Quality};
use wasm_bindgen::prelude::*;

/// Decode a JPEG, PNG or WebP file, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error for other formats or corrupted data.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Stretch `image` to `width x height` and encode it.
///
/// # Arguments
///
/// * `format` - `jpeg`, `png` or `webp`
/// * `quality` - 0.0 to 1.0; ignored for PNG
///
/// # Returns
///
/// The encoded bytes as a `Uint8Array`.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsSourceImage,
    width: u32,
    height: u32,
    format: &str,
    quality: f32,
) -> Result<Vec<u8>, JsValue> {
    let target = build_target(width, height, format, quality)
        .map_err(|e| JsValue::from_str(&e))?;
    encode::encode(image.source(), &target)
        .map(|result| result.reference)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn build_target(width: u32, height: u32, format: &str, quality: f32) -> Result<TargetSpec, String> {
    let format: OutputFormat = format.parse().map_err(|e| format!("{}", e))?;
    Ok(TargetSpec::new(
        Dimensions::new(width, height),
        format,
        Quality::new(quality),
    ))
}

/// Tests for native bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32 targets, so
/// these exercise the pieces underneath.
#[cfg(test)]
mod tests {
    use super::*;
    use resizer_core::SourceImage;

    #[test]
    fn test_build_target() {
        let target = build_target(960, 540, "JPG", 0.8).unwrap();
        assert_eq!(target.format, OutputFormat::Jpeg);
        assert_eq!(target.dimensions(), Dimensions::new(960, 540));
        assert_eq!(target.quality.as_percent(), 80);
    }

    #[test]
    fn test_build_target_unknown_format() {
        let err = build_target(10, 10, "bmp", 0.8).unwrap_err();
        assert_eq!(err, "Unknown output format: bmp");
    }

    #[test]
    fn test_encode_oversized_target_is_error() {
        let img = JsSourceImage::from_source(SourceImage::new(2, 2, vec![0u8; 16]));
        let target = build_target(100_000, 56_250, "jpeg", 0.8).unwrap();
        assert!(matches!(
            encode::encode(img.source(), &target),
            Err(resizer_core::EncodeError::TargetTooLarge { .. })
        ));
    }

    #[test]
    fn test_encode_from_js_source_image() {
        let img = JsSourceImage::from_source(SourceImage::new(20, 10, vec![90u8; 20 * 10 * 4]));
        let target = build_target(10, 5, "png", 1.0).unwrap();

        let result = encode::encode(img.source(), &target).unwrap();
        assert_eq!(&result.reference[1..4], b"PNG");
        assert_eq!(result.dimensions(), Dimensions::new(10, 5));
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_image_jpeg() {
        let img = JsSourceImage::new(50, 50, vec![128u8; 50 * 50 * 4]).unwrap();
        let jpeg = encode_image(&img, 25, 25, "jpeg", 0.9).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_encode_image_zero_dimension() {
        let img = JsSourceImage::new(5, 5, vec![0u8; 5 * 5 * 4]).unwrap();
        assert!(encode_image(&img, 0, 5, "png", 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_image_oversized_target() {
        let img = JsSourceImage::new(2, 2, vec![0u8; 2 * 2 * 4]).unwrap();
        assert!(encode_image(&img, 100_000, 56_250, "png", 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0x00, 0x01, 0x02]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_source_image_wrong_length() {
        assert!(JsSourceImage::new(5, 5, vec![0u8; 10]).is_err());
    }
}
