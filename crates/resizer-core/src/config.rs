//! Session defaults.
//!
//! The host page may pass its own values (e.g. a different preset list); any
//! field it leaves out keeps the built-in default. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::dimensions::{builtin_presets, Preset};
use crate::format::{OutputFormat, DEFAULT_QUALITY_PERCENT};

/// Initial control values and the preset list for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Quality slider position on startup, in percent.
    pub default_quality_percent: u8,
    /// Output format selected on startup.
    pub default_format: OutputFormat,
    /// Whether the aspect lock starts enabled.
    pub lock_aspect: bool,
    /// Presets offered by the size selector.
    pub presets: Vec<Preset>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_quality_percent: DEFAULT_QUALITY_PERCENT,
            default_format: OutputFormat::Jpeg,
            lock_aspect: true,
            presets: builtin_presets(),
        }
    }
}

impl SessionConfig {
    /// Look up a preset by id in this configuration.
    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }
}
