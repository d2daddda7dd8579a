//! WASM-compatible wrapper types.
//!
//! This module provides JavaScript-friendly types that wrap the core resizer
//! types, handling the conversion between Rust and JavaScript data representations.

use resizer_core::decode::SourceImage;
use resizer_core::upload::format_file_size;
use resizer_core::EncodedResult;
use wasm_bindgen::prelude::*;

/// A decoded source image for the native pipeline.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create an image from RGBA pixel data (4 bytes per pixel, row-major),
    /// e.g. the `data` of a canvas `ImageData`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        SourceImage::from_rgba(width, height, pixels)
            .map(Self::from_source)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }
}

/// A displayed resize result.
///
/// `url` is an object URL owned by the session that produced it; it is
/// revoked once a newer result replaces it or the session is reset.
#[wasm_bindgen]
pub struct JsEncodedResult {
    url: String,
    byte_size: u64,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsEncodedResult {
    /// Object URL of the encoded image, usable as an `<img>` src or download href.
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Encoded size in bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> f64 {
        self.byte_size as f64
    }

    /// Encoded size formatted for display, e.g. `"12.34 KB"`.
    #[wasm_bindgen(getter)]
    pub fn formatted_size(&self) -> String {
        format_file_size(self.byte_size)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<&EncodedResult<String>> for JsEncodedResult {
    fn from(result: &EncodedResult<String>) -> Self {
        Self {
            url: result.reference.clone(),
            byte_size: result.byte_size,
            width: result.width,
            height: result.height,
        }
    }
}
