//! Resize/encode pipeline.
//!
//! This module provides functionality for:
//! - Stretching a source image onto a surface of the target size
//! - Encoding that surface to JPEG, PNG or WebP at a given quality
//! - Describing the output (`EncodedResult`) independently of how the
//!   encoded bytes are held
//!
//! # Architecture
//!
//! In the browser the surface is a canvas and the encoder is `toBlob`; that
//! backend lives in the WASM crate and shares `TargetSpec`, `EncodedResult`
//! and `EncodeError` with the native backend here. Every settings change
//! runs a full encode; there is no incremental re-encode.
//!
//! # Examples
//!
//! ```ignore
//! use resizer_core::encode::{encode, TargetSpec};
//!
//! let result = encode(&source, &target).unwrap();
//! println!("Encoded {} bytes", result.byte_size);
//! ```

mod codec;
mod pipeline;
mod types;

pub use codec::{encode_jpeg, encode_png, encode_rgba, encode_webp};
pub use pipeline::{draw_scaled, encode, encode_with_filter};
pub use types::{
    check_dimensions, EncodeError, EncodedResult, TargetSpec, MAX_DIMENSION, MAX_PIXELS,
};
