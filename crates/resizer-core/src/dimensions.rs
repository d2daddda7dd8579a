//! Target dimension resolution.
//!
//! Turns a preset selection or a manual edit of one axis into the width/height
//! pair handed to the encode pipeline.
//!
//! # Rules
//!
//! - Presets are absolute: the preset pair is returned verbatim, the aspect
//!   lock is not applied.
//! - A manual edit with the aspect lock on derives the other axis from the
//!   **original** image ratio, never from the previous target, so chained
//!   edits do not accumulate rounding drift.
//! - A manual edit with the lock off only touches the edited axis.
//! - Unparseable input resolves to `0`, which marks the pair as not yet
//!   valid for processing.

use serde::{Deserialize, Serialize};

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both axes are at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Get the value of one axis.
    pub fn get(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    fn with(self, axis: Axis, value: u32) -> Self {
        match axis {
            Axis::Width => Self {
                width: value,
                ..self
            },
            Axis::Height => Self {
                height: value,
                ..self
            },
        }
    }
}

/// One of the two image axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    /// The axis that is derived when this one is edited.
    pub fn other(self) -> Axis {
        match self {
            Axis::Width => Axis::Height,
            Axis::Height => Axis::Width,
        }
    }
}

/// A named fixed target size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Stable identifier, e.g. `"640x480"`.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Preset {
    pub fn new(id: &str, name: &str, width: u32, height: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Identifier of the pseudo-preset that stands for manual entry.
pub const CUSTOM_PRESET_ID: &str = "custom";

/// Built-in presets offered by the size selector.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new("640x480", "Small (640×480)", 640, 480),
        Preset::new("1280x720", "Medium (1280×720)", 1280, 720),
        Preset::new("1920x1080", "Large (1920×1080)", 1920, 1080),
        Preset::new("800x800", "Square (800×800)", 800, 800),
    ]
}

/// Look up a built-in preset by id.
pub fn find_preset(id: &str) -> Option<Preset> {
    builtin_presets().into_iter().find(|p| p.id == id)
}

/// Whether the current size came from a preset or from manual entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeMode {
    #[default]
    Custom,
    Preset(String),
}

impl SizeMode {
    /// The selector value for this mode (`"custom"` or the preset id).
    pub fn id(&self) -> &str {
        match self {
            SizeMode::Custom => CUSTOM_PRESET_ID,
            SizeMode::Preset(id) => id,
        }
    }
}

/// A change requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionRequest {
    /// Select a fixed preset size.
    Preset(Preset),
    /// Type a new value into one axis.
    Manual { axis: Axis, value: u32 },
}

impl DimensionRequest {
    /// Build a manual edit from raw form input.
    pub fn manual(axis: Axis, raw: &str) -> Self {
        DimensionRequest::Manual {
            axis,
            value: parse_dimension(raw),
        }
    }
}

/// Parse a form value into a pixel count.
///
/// Reads an optional sign followed by the leading decimal digits, skipping
/// leading whitespace, and ignores whatever follows (`"640px"` is 640).
/// Empty, non-numeric, zero or negative input yields `0`. Values past
/// `u32::MAX` saturate.
pub fn parse_dimension(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d);
    }

    if !seen_digit || negative {
        0
    } else {
        value
    }
}

/// Derive the other axis from `value` using the original image ratio.
///
/// Half-pixel results round up.
pub fn derive_axis(original: Dimensions, edited: Axis, value: u32) -> u32 {
    let edited_len = original.get(edited);
    if edited_len == 0 {
        return 0;
    }
    let ratio = original.get(edited.other()) as f64 / edited_len as f64;
    // `as` saturates on overflow and maps NaN to 0.
    (value as f64 * ratio).round() as u32
}

/// Resolve the target dimensions for a request.
///
/// # Arguments
///
/// * `original` - Natural size of the loaded image
/// * `request` - Preset selection or manual axis edit
/// * `lock_aspect` - Derive the other axis from the original ratio on manual edits
/// * `previous` - Target dimensions before this request
pub fn resolve(
    original: Dimensions,
    request: &DimensionRequest,
    lock_aspect: bool,
    previous: Dimensions,
) -> Dimensions {
    match *request {
        DimensionRequest::Preset(ref preset) => preset.dimensions(),
        DimensionRequest::Manual { axis, value } if lock_aspect => {
            Dimensions::new(0, 0)
                .with(axis, value)
                .with(axis.other(), derive_axis(original, axis, value))
        }
        DimensionRequest::Manual { axis, value } => previous.with(axis, value),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
