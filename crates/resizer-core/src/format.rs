//! Output formats and encode quality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

/// Returned when a format name or MIME type is not one of the supported three.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown output format: {0}")]
pub struct UnknownFormat(pub String);

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Webp];

    /// MIME type handed to the encoder, e.g. `image/jpeg`.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// File extension used for downloads (no leading dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Upper-case display label.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
        }
    }

    /// Whether the quality setting affects the output.
    pub fn is_lossy(self) -> bool {
        !matches!(self, OutputFormat::Png)
    }

    /// Parse a MIME type such as `image/png`.
    pub fn from_mime_type(mime: &str) -> Result<Self, UnknownFormat> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.mime_type().eq_ignore_ascii_case(mime.trim()))
            .ok_or_else(|| UnknownFormat(mime.to_string()))
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lowest value the quality slider offers, in percent.
pub const MIN_QUALITY_PERCENT: u8 = 10;
/// Highest value the quality slider offers, in percent.
pub const MAX_QUALITY_PERCENT: u8 = 100;
/// Slider position on startup.
pub const DEFAULT_QUALITY_PERCENT: u8 = 80;

/// Encoder quality in `[0.0, 1.0]`.
///
/// Lossless formats accept it and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct Quality(f32);

impl From<f32> for Quality {
    fn from(value: f32) -> Self {
        Quality::new(value)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::from_percent(DEFAULT_QUALITY_PERCENT)
    }
}

impl Quality {
    /// Clamp `value` into `[0, 1]`. NaN falls back to the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Quality(value.clamp(0.0, 1.0))
    }

    /// Map a slider position in `[10, 100]` to `[0.10, 1.00]`.
    pub fn from_percent(percent: u8) -> Self {
        let percent = percent.clamp(MIN_QUALITY_PERCENT, MAX_QUALITY_PERCENT);
        Quality(percent as f32 / 100.0)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Nearest whole percent.
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }

    /// Quality on the 1-100 scale the JPEG encoder expects.
    pub fn as_jpeg_quality(self) -> u8 {
        self.as_percent().clamp(1, 100)
    }
}
