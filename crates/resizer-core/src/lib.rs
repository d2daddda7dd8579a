//! Resizer Core - dimension resolution and resize/encode pipeline
//!
//! This crate holds everything behind the image resizer's controls:
//! deriving target dimensions from presets and manual edits, stretching a
//! source image to those dimensions and encoding it as JPEG, PNG or WebP,
//! and the session state that keeps only the latest encode on display.
//!
//! # Module Structure
//!
//! - `dimensions` - Dimension resolver (presets, aspect lock, input parsing)
//! - `format` - Output formats and quality
//! - `decode` - Native source decoding (JPEG/PNG/WebP, EXIF orientation)
//! - `encode` - Resize/encode pipeline and per-format encoders
//! - `session` - Session state with last-settings-wins sequencing
//! - `upload` - Upload validation and file display helpers
//! - `config` - Session defaults

pub mod config;
pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod format;
pub mod session;
pub mod upload;

pub use config::SessionConfig;
pub use decode::{decode_image, DecodeError, SourceImage};
pub use dimensions::{resolve, Axis, DimensionRequest, Dimensions, Preset, SizeMode};
pub use encode::{encode, EncodeError, EncodedResult, TargetSpec};
pub use format::{OutputFormat, Quality};
pub use session::{Completion, EncodeTicket, SessionError, SessionState};
pub use upload::{validate_mime_type, SourceInfo, UploadError};
