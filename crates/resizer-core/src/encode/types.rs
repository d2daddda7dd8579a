//! Pipeline input and output types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dimensions::Dimensions;
use crate::format::{OutputFormat, Quality};

/// Largest accepted target width or height.
pub const MAX_DIMENSION: u32 = 32768;

/// Largest accepted target area. 100 megapixels is 400MB of RGBA.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Errors that can occur in the resize/encode pipeline.
///
/// Every error is terminal for the attempt that raised it: no partial output
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid target: width ({width}) and height ({height}) must be non-zero")]
    InvalidTarget { width: u32, height: u32 },

    /// Width, height or area exceeds the surface limits
    #[error(
        "Target too large: {width}x{height} exceeds {max_dimension}px per side or {max_pixels} pixels"
    )]
    TargetTooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
        max_pixels: u64,
    },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The surface or encoder failed
    #[error("Image processing failed: {0}")]
    EncodeFailure(String),
}

/// What the pipeline should produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Passed to every encoder; lossless formats ignore it.
    pub quality: Quality,
}

impl TargetSpec {
    pub fn new(dimensions: Dimensions, format: OutputFormat, quality: Quality) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            format,
            quality,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Reject zero-area targets and surfaces too large to allocate.
    pub fn validate(&self) -> Result<(), EncodeError> {
        check_dimensions(self.width, self.height)
    }
}

/// Check a surface size against zero and [`MAX_DIMENSION`]/[`MAX_PIXELS`].
pub fn check_dimensions(width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidTarget { width, height });
    }
    let too_large = || EncodeError::TargetTooLarge {
        width,
        height,
        max_dimension: MAX_DIMENSION,
        max_pixels: MAX_PIXELS,
    };
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(too_large());
    }
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(too_large());
    }
    Ok(())
}

/// One encoded output.
///
/// `R` is the handle to the encoded bytes: the bytes themselves for the
/// native backend, an object URL in the browser. A result is superseded by
/// the next successful encode and its handle should then be released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedResult<R> {
    pub reference: R,
    /// Size of the encoded bytes.
    pub byte_size: u64,
    pub width: u32,
    pub height: u32,
}

impl<R> EncodedResult<R> {
    pub fn new(reference: R, byte_size: u64, dimensions: Dimensions) -> Self {
        Self {
            reference,
            byte_size,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Swap the reference for another handle to the same bytes.
    pub fn map_reference<T>(self, f: impl FnOnce(R) -> T) -> EncodedResult<T> {
        EncodedResult {
            reference: f(self.reference),
            byte_size: self.byte_size,
            width: self.width,
            height: self.height,
        }
    }
}
