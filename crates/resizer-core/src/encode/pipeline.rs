//! Native resize/encode pipeline.
//!
//! Mirrors what the browser backend does with a canvas: allocate a surface of
//! exactly the target size, stretch the source over it, encode the surface.

use image::RgbaImage;
use tracing::debug;

use super::codec::encode_rgba;
use super::{check_dimensions, EncodeError, EncodedResult, TargetSpec};
use crate::decode::{FilterType, SourceImage};

/// Resize `source` to the target size and encode it.
///
/// The source is stretched to fill the target exactly; keeping the aspect
/// ratio is the resolver's job. The returned reference holds the encoded
/// bytes.
///
/// # Errors
///
/// Returns `EncodeError::InvalidTarget` for zero-area targets,
/// `EncodeError::TargetTooLarge` past the surface limits, and
/// `EncodeError::EncodeFailure` if the source is unusable or the encoder fails.
pub fn encode(
    source: &SourceImage,
    target: &TargetSpec,
) -> Result<EncodedResult<Vec<u8>>, EncodeError> {
    encode_with_filter(source, target, FilterType::default())
}

/// Same as [`encode`] with an explicit resampling filter.
pub fn encode_with_filter(
    source: &SourceImage,
    target: &TargetSpec,
    filter: FilterType,
) -> Result<EncodedResult<Vec<u8>>, EncodeError> {
    target.validate()?;

    let surface = draw_scaled(source, target.width, target.height, filter)?;
    let bytes = encode_rgba(
        surface.as_raw(),
        target.width,
        target.height,
        target.format,
        target.quality,
    )?;

    debug!(
        width = target.width,
        height = target.height,
        format = %target.format,
        quality = target.quality.value(),
        bytes = bytes.len(),
        "encoded image"
    );

    let byte_size = bytes.len() as u64;
    Ok(EncodedResult::new(bytes, byte_size, target.dimensions()))
}

/// Draw `source` onto a new `width x height` surface, stretched to fill it.
pub fn draw_scaled(
    source: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbaImage, EncodeError> {
    check_dimensions(width, height)?;
    if source.is_empty() {
        return Err(EncodeError::EncodeFailure("source image is empty".to_string()));
    }

    let view = source.as_rgba_image().ok_or_else(|| {
        EncodeError::EncodeFailure(format!(
            "source buffer does not match {}x{}",
            source.width, source.height
        ))
    })?;

    // Fast path: if dimensions match, just copy
    if source.width == width && source.height == height {
        return RgbaImage::from_raw(width, height, source.pixels.clone()).ok_or_else(|| {
            EncodeError::EncodeFailure("failed to copy source surface".to_string())
        });
    }

    Ok(image::imageops::resize(
        &view,
        width,
        height,
        filter.to_image_filter(),
    ))
}
