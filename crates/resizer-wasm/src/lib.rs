//! Resizer WASM - WebAssembly bindings for the image resizer
//!
//! This crate exposes resizer-core to the browser UI and provides the
//! canvas-backed resize/encode pipeline.
//!
//! # Module Structure
//!
//! - `session` - `ResizeSession`, the stateful object behind the controls
//! - `canvas` - Canvas draw + `toBlob` pipeline backend
//! - `native` - Decode/encode inside WASM with the core pipeline
//! - `controls` - Stateless helpers (upload validation, sizes, presets)
//! - `logging` - `tracing` events to the browser console
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { ResizeSession } from '@resizer/wasm';
//!
//! await init();
//!
//! const session = new ResizeSession();
//! session.load_source(img, file.name, file.type, file.size);
//! session.set_width('960');
//! const result = await session.process();
//! console.log(`${result.width}x${result.height}, ${result.formatted_size}`);
//! ```

use wasm_bindgen::prelude::*;

mod canvas;
mod controls;
mod logging;
mod native;
mod session;
mod types;

pub use controls::{
    accepted_types, download_file_name, format_file_size, presets, resolve_dimensions,
    validate_upload_type,
};
pub use native::{decode_image, encode_image};
pub use session::ResizeSession;
pub use types::{JsEncodedResult, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
///
/// Installs the console log subscriber: debug builds show every core event,
/// release builds warnings and errors.
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(logging::default_level());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
