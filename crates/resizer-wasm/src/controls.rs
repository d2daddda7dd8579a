//! Stateless helpers for the upload, controls and preview panels.

use resizer_core::dimensions::{self, Axis, DimensionRequest, Dimensions};
use resizer_core::upload;
use resizer_core::OutputFormat;
use wasm_bindgen::prelude::*;

/// Check an uploaded file's MIME type.
///
/// # Returns
///
/// The matching output format name (`jpeg`, `png`, `webp`), or an error
/// carrying the message to show the user.
#[wasm_bindgen]
pub fn validate_upload_type(mime_type: &str) -> Result<String, JsValue> {
    upload::validate_mime_type(mime_type)
        .map(|format| format.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Accepted MIME types, e.g. for a file input's `accept` attribute.
#[wasm_bindgen]
pub fn accepted_types() -> String {
    upload::ACCEPTED_MIME_TYPES.join(", ")
}

/// Format a byte count as `B`, `KB` or `MB`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    upload::format_file_size(bytes.max(0.0) as u64)
}

/// Built-in presets as `{ id, name, width, height }[]`.
#[wasm_bindgen]
pub fn presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&dimensions::builtin_presets())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve a manual edit without a session.
///
/// # Arguments
///
/// * `axis` - `"width"` or anything else for height
/// * `raw` - Raw input value; unparseable input gives `0`
///
/// # Returns
///
/// `[width, height]`
#[wasm_bindgen]
pub fn resolve_dimensions(
    original_width: u32,
    original_height: u32,
    axis: &str,
    raw: &str,
    lock_aspect: bool,
    previous_width: u32,
    previous_height: u32,
) -> Vec<u32> {
    let axis = if axis.eq_ignore_ascii_case("width") {
        Axis::Width
    } else {
        Axis::Height
    };
    let resolved = dimensions::resolve(
        Dimensions::new(original_width, original_height),
        &DimensionRequest::manual(axis, raw),
        lock_aspect,
        Dimensions::new(previous_width, previous_height),
    );
    vec![resolved.width, resolved.height]
}

/// `<stem>.<format>` for the download link.
#[wasm_bindgen]
pub fn download_file_name(stem: &str, format: &str) -> Result<String, JsValue> {
    let format: OutputFormat = format
        .parse()
        .map_err(|e: resizer_core::format::UnknownFormat| JsValue::from_str(&e.to_string()))?;
    Ok(upload::download_file_name(stem, format))
}
