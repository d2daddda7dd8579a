//! Source image decoding.
//!
//! In the browser the platform decoder turns the uploaded file into the
//! source raster. This module is the native counterpart, used by the native
//! pipeline backend and by tests:
//! - Decoding JPEG, PNG and WebP files to RGBA
//! - Applying the EXIF orientation tag the way browsers do
//!
//! # Examples
//!
//! ```ignore
//! use resizer_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, FilterType, Orientation, SourceImage};
