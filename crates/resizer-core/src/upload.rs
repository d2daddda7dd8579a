//! Upload validation and file display helpers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dimensions::Dimensions;
use crate::format::OutputFormat;

/// MIME types accepted at the upload boundary.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Errors raised when a file is offered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The file is not JPEG, PNG or WebP.
    #[error("Please upload a valid image (JPEG, PNG, or WebP)")]
    UnsupportedInputType { mime: String },
}

/// Check an uploaded file's MIME type.
///
/// Returns the matching format on success so callers can default the output
/// to the input type if they want to.
pub fn validate_mime_type(mime: &str) -> Result<OutputFormat, UploadError> {
    OutputFormat::from_mime_type(mime).map_err(|_| UploadError::UnsupportedInputType {
        mime: mime.to_string(),
    })
}

/// Describes the loaded file for the info panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Full file name as uploaded.
    pub file_name: String,
    /// File name up to the first dot, used as the default download name.
    pub stem: String,
    /// MIME subtype in upper case, e.g. `JPEG`.
    pub type_label: String,
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
    /// Natural size of the decoded image.
    pub dimensions: Dimensions,
}

impl SourceInfo {
    pub fn new(file_name: &str, mime: &str, file_size: u64, dimensions: Dimensions) -> Self {
        Self {
            file_name: file_name.to_string(),
            stem: file_stem(file_name).to_string(),
            type_label: type_label(mime),
            file_size,
            dimensions,
        }
    }
}

/// Text before the first `.` of a file name.
pub fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or_default()
}

/// Upper-cased MIME subtype (`image/webp` becomes `WEBP`).
pub fn type_label(mime: &str) -> String {
    mime.split('/').nth(1).unwrap_or(mime).to_ascii_uppercase()
}

/// Human readable byte count: `B` below 1 KiB, then `KB` and `MB` with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    match bytes {
        0 => "0 B".to_string(),
        b if b < KIB => format!("{} B", b),
        b if b < MIB => format!("{:.2} KB", b as f64 / KIB as f64),
        b => format!("{:.2} MB", b as f64 / MIB as f64),
    }
}

/// Name offered for the download: `<stem>.<extension>`.
pub fn download_file_name(stem: &str, format: OutputFormat) -> String {
    let stem = stem.trim();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{}.{}", stem, format.extension())
}
