//! Per-session resize state.
//!
//! Holds the loaded source, the control values and the currently displayed
//! result, and mutates them only through explicit setters. The caller asks
//! for an [`EncodeTicket`] whenever the settings change, runs the encode
//! however it likes (synchronously or on a future), and reports back with
//! [`SessionState::complete`].
//!
//! # Ordering
//!
//! Every ticket carries a sequence number. Only a completion for the most
//! recently issued ticket is applied; anything older is discarded even if it
//! arrives later, so the displayed output always matches the last settings.
//! Loading a new source or resetting also invalidates outstanding tickets.
//!
//! # Releasing results
//!
//! Results are owned by the session until superseded. Setters and
//! completions hand superseded references back to the caller, which releases
//! them (e.g. revokes an object URL).

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::dimensions::{resolve, Axis, DimensionRequest, Dimensions, Preset, SizeMode, CUSTOM_PRESET_ID};
use crate::encode::{EncodeError, EncodedResult, TargetSpec};
use crate::format::{OutputFormat, Quality};
use crate::upload::{download_file_name, SourceInfo};

/// Errors raised by session setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Permission to run one encode with a snapshot of the settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeTicket {
    pub sequence: u64,
    pub target: TargetSpec,
}

/// Outcome of reporting an encode back to the session.
#[derive(Debug, PartialEq)]
pub enum Completion<R> {
    /// The result is now current. `released` is the reference it replaced.
    Applied { released: Option<R> },
    /// The latest encode failed. The previous result stays displayed.
    Failed(EncodeError),
    /// A newer ticket was issued meanwhile. `discarded` is this call's own
    /// reference, if it produced one.
    Stale { discarded: Option<R> },
}

/// State of one resize session.
#[derive(Debug)]
pub struct SessionState<R> {
    config: SessionConfig,
    source: Option<SourceInfo>,
    dimensions: Dimensions,
    mode: SizeMode,
    lock_aspect: bool,
    quality: Quality,
    format: OutputFormat,
    latest_sequence: u64,
    in_flight: bool,
    current: Option<EncodedResult<R>>,
    last_error: Option<EncodeError>,
}

impl<R> Default for SessionState<R> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<R> SessionState<R> {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            source: None,
            dimensions: Dimensions::default(),
            mode: SizeMode::Custom,
            lock_aspect: config.lock_aspect,
            quality: Quality::from_percent(config.default_quality_percent),
            format: config.default_format,
            latest_sequence: 0,
            in_flight: false,
            current: None,
            last_error: None,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Source lifecycle
    // ------------------------------------------------------------------

    /// Replace the source. Target dimensions reset to the natural size.
    ///
    /// Returns the reference of the result that is no longer valid.
    pub fn load_source(&mut self, info: SourceInfo) -> Option<R> {
        debug!(
            file = %info.file_name,
            width = info.dimensions.width,
            height = info.dimensions.height,
            "source loaded"
        );
        self.dimensions = info.dimensions;
        self.source = Some(info);
        self.mode = SizeMode::Custom;
        self.invalidate()
    }

    /// Drop the source and any result. Quality, format and the aspect lock
    /// keep their values.
    pub fn reset(&mut self) -> Option<R> {
        self.source = None;
        self.dimensions = Dimensions::default();
        self.mode = SizeMode::Custom;
        self.invalidate()
    }

    fn invalidate(&mut self) -> Option<R> {
        self.latest_sequence += 1;
        self.in_flight = false;
        self.last_error = None;
        self.current.take().map(|r| r.reference)
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    /// Select a preset by id. `"custom"` switches to manual mode and keeps
    /// the current dimensions.
    ///
    /// Returns whether the target dimensions changed.
    pub fn select_preset(&mut self, id: &str) -> Result<bool, SessionError> {
        if id == CUSTOM_PRESET_ID {
            self.mode = SizeMode::Custom;
            return Ok(false);
        }

        let preset = self
            .config
            .preset(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownPreset(id.to_string()))?;
        self.mode = SizeMode::Preset(preset.id.clone());
        Ok(self.apply(DimensionRequest::Preset(preset)))
    }

    /// Apply raw form input to one axis. Switches to manual mode.
    ///
    /// Returns whether the target dimensions changed.
    pub fn edit_dimension(&mut self, axis: Axis, raw: &str) -> bool {
        self.mode = SizeMode::Custom;
        self.apply(DimensionRequest::manual(axis, raw))
    }

    fn apply(&mut self, request: DimensionRequest) -> bool {
        let original = self.original_dimensions();
        let resolved = resolve(original, &request, self.lock_aspect, self.dimensions);
        let changed = resolved != self.dimensions;
        self.dimensions = resolved;
        changed
    }

    /// Toggle the aspect lock. Existing dimensions are left as they are.
    pub fn set_lock_aspect(&mut self, lock: bool) {
        self.lock_aspect = lock;
    }

    /// Set quality from the slider position in percent.
    pub fn set_quality_percent(&mut self, percent: u8) -> bool {
        self.set_quality(Quality::from_percent(percent))
    }

    /// Returns whether the quality changed.
    pub fn set_quality(&mut self, quality: Quality) -> bool {
        let changed = quality != self.quality;
        self.quality = quality;
        changed
    }

    /// Returns whether the format changed.
    pub fn set_format(&mut self, format: OutputFormat) -> bool {
        let changed = format != self.format;
        self.format = format;
        changed
    }

    // ------------------------------------------------------------------
    // Encode sequencing
    // ------------------------------------------------------------------

    /// Target for the current settings, or `None` while there is no source
    /// or either axis is zero.
    pub fn target(&self) -> Option<TargetSpec> {
        if self.source.is_none() || !self.dimensions.is_valid() {
            return None;
        }
        Some(TargetSpec::new(self.dimensions, self.format, self.quality))
    }

    /// Issue a ticket for the current settings.
    ///
    /// Any ticket issued before this one becomes stale. Returns `None` when
    /// there is nothing valid to encode.
    pub fn begin_encode(&mut self) -> Option<EncodeTicket> {
        let target = self.target()?;
        self.latest_sequence += 1;
        self.in_flight = true;
        debug!(
            sequence = self.latest_sequence,
            width = target.width,
            height = target.height,
            format = %target.format,
            "encode issued"
        );
        Some(EncodeTicket {
            sequence: self.latest_sequence,
            target,
        })
    }

    /// Report the outcome of the encode started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: &EncodeTicket,
        result: Result<EncodedResult<R>, EncodeError>,
    ) -> Completion<R> {
        if ticket.sequence != self.latest_sequence {
            debug!(
                sequence = ticket.sequence,
                latest = self.latest_sequence,
                "discarding stale encode"
            );
            return Completion::Stale {
                discarded: result.ok().map(|r| r.reference),
            };
        }

        self.in_flight = false;
        match result {
            Ok(encoded) => {
                debug!(
                    sequence = ticket.sequence,
                    bytes = encoded.byte_size,
                    "encode applied"
                );
                self.last_error = None;
                let released = self.current.replace(encoded).map(|r| r.reference);
                Completion::Applied { released }
            }
            Err(err) => {
                warn!(sequence = ticket.sequence, error = %err, "encode failed");
                self.last_error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn presets(&self) -> &[Preset] {
        &self.config.presets
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }

    /// Natural size of the loaded source, zero when none is loaded.
    pub fn original_dimensions(&self) -> Dimensions {
        self.source
            .as_ref()
            .map(|s| s.dimensions)
            .unwrap_or_default()
    }

    /// Current target dimensions (may contain zeros while editing).
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn mode(&self) -> &SizeMode {
        &self.mode
    }

    pub fn lock_aspect(&self) -> bool {
        self.lock_aspect
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The displayed result, if any.
    pub fn current(&self) -> Option<&EncodedResult<R>> {
        self.current.as_ref()
    }

    /// Error of the latest encode, cleared by the next success.
    pub fn last_error(&self) -> Option<&EncodeError> {
        self.last_error.as_ref()
    }

    /// Whether the latest issued encode has not reported back yet.
    pub fn is_processing(&self) -> bool {
        self.in_flight
    }

    /// Download name for the current format; `stem` overrides the source
    /// file's stem.
    pub fn download_name(&self, stem: Option<&str>) -> String {
        let stem = stem
            .or_else(|| self.source.as_ref().map(|s| s.stem.as_str()))
            .unwrap_or_default();
        download_file_name(stem, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::SourceImage;
    use crate::encode::encode;

    type Session = SessionState<String>;

    fn hd_info() -> SourceInfo {
        SourceInfo::new("photo.jpg", "image/jpeg", 123_456, Dimensions::new(1920, 1080))
    }

    fn loaded() -> Session {
        let mut session = Session::default();
        session.load_source(hd_info());
        session
    }

    fn fake_result(ticket: &EncodeTicket, url: &str) -> Result<EncodedResult<String>, EncodeError> {
        Ok(EncodedResult::new(url.to_string(), 100, ticket.target.dimensions()))
    }

    #[test]
    fn test_defaults() {
        let session = Session::default();
        assert!(session.lock_aspect());
        assert_eq!(session.quality().as_percent(), 80);
        assert_eq!(session.format(), OutputFormat::Jpeg);
        assert!(session.target().is_none());
    }

    #[test]
    fn test_load_source_sets_natural_dimensions() {
        let session = loaded();
        assert_eq!(session.dimensions(), Dimensions::new(1920, 1080));
        assert_eq!(session.mode(), &SizeMode::Custom);
        assert!(session.target().is_some());
    }

    #[test]
    fn test_edit_width_locked() {
        let mut session = loaded();
        assert!(session.edit_dimension(Axis::Width, "960"));
        assert_eq!(session.dimensions(), Dimensions::new(960, 540));
    }

    #[test]
    fn test_edit_unlocked() {
        let mut session = loaded();
        session.set_lock_aspect(false);
        session.edit_dimension(Axis::Height, "100");
        assert_eq!(session.dimensions(), Dimensions::new(1920, 100));
    }

    #[test]
    fn test_lock_toggle_does_not_recompute() {
        let mut session = loaded();
        session.set_lock_aspect(false);
        session.edit_dimension(Axis::Height, "100");
        session.set_lock_aspect(true);
        assert_eq!(session.dimensions(), Dimensions::new(1920, 100));
    }

    #[test]
    fn test_preset_then_manual_edit() {
        let mut session = loaded();
        assert!(session.select_preset("640x480").unwrap());
        assert_eq!(session.dimensions(), Dimensions::new(640, 480));
        assert_eq!(session.mode().id(), "640x480");

        session.edit_dimension(Axis::Width, "320");
        assert_eq!(session.mode(), &SizeMode::Custom);
        // Derived from the original 16:9 ratio, not the preset's 4:3
        assert_eq!(session.dimensions(), Dimensions::new(320, 180));
    }

    #[test]
    fn test_select_custom_keeps_dimensions() {
        let mut session = loaded();
        session.select_preset("800x800").unwrap();
        assert!(!session.select_preset("custom").unwrap());
        assert_eq!(session.dimensions(), Dimensions::new(800, 800));
        assert_eq!(session.mode(), &SizeMode::Custom);
    }

    #[test]
    fn test_unknown_preset() {
        let mut session = loaded();
        assert_eq!(
            session.select_preset("4k"),
            Err(SessionError::UnknownPreset("4k".into()))
        );
        assert_eq!(session.dimensions(), Dimensions::new(1920, 1080));
    }

    #[test]
    fn test_zero_guard() {
        let mut session = loaded();
        session.edit_dimension(Axis::Width, "");
        assert!(session.target().is_none());
        assert!(session.begin_encode().is_none());

        session.set_lock_aspect(false);
        session.edit_dimension(Axis::Width, "200");
        session.edit_dimension(Axis::Height, "abc");
        assert_eq!(session.dimensions(), Dimensions::new(200, 0));
        assert!(session.begin_encode().is_none());
    }

    #[test]
    fn test_no_source_no_encode() {
        let mut session = Session::default();
        session.edit_dimension(Axis::Width, "100");
        assert!(session.begin_encode().is_none());
    }

    #[test]
    fn test_setters_report_changes() {
        let mut session = loaded();
        assert!(!session.set_quality_percent(80));
        assert!(session.set_quality_percent(55));
        assert!(!session.set_format(OutputFormat::Jpeg));
        assert!(session.set_format(OutputFormat::Webp));
        assert!(!session.edit_dimension(Axis::Width, "1920"));
    }

    #[test]
    fn test_last_wins() {
        let mut session = loaded();

        session.edit_dimension(Axis::Width, "960");
        let a = session.begin_encode().unwrap();
        session.set_format(OutputFormat::Png);
        let b = session.begin_encode().unwrap();
        assert!(b.sequence > a.sequence);

        // B finishes first, A arrives late
        let done_b = session.complete(&b, fake_result(&b, "blob:b"));
        assert_eq!(done_b, Completion::Applied { released: None });

        let done_a = session.complete(&a, fake_result(&a, "blob:a"));
        assert_eq!(
            done_a,
            Completion::Stale {
                discarded: Some("blob:a".into())
            }
        );

        let current = session.current().unwrap();
        assert_eq!(current.reference, "blob:b");
        assert_eq!(b.target.format, OutputFormat::Png);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut session = loaded();
        let a = session.begin_encode().unwrap();
        let b = session.begin_encode().unwrap();

        let done = session.complete(&a, Err(EncodeError::EncodeFailure("late".into())));
        assert_eq!(done, Completion::Stale { discarded: None });
        assert!(session.last_error().is_none());
        assert!(session.is_processing());

        session.complete(&b, fake_result(&b, "blob:b"));
        assert!(!session.is_processing());
    }

    #[test]
    fn test_applied_releases_previous() {
        let mut session = loaded();
        let first = session.begin_encode().unwrap();
        session.complete(&first, fake_result(&first, "blob:1"));

        session.set_quality_percent(50);
        let second = session.begin_encode().unwrap();
        let done = session.complete(&second, fake_result(&second, "blob:2"));
        assert_eq!(
            done,
            Completion::Applied {
                released: Some("blob:1".into())
            }
        );
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let mut session = loaded();
        let first = session.begin_encode().unwrap();
        session.complete(&first, fake_result(&first, "blob:ok"));

        session.set_format(OutputFormat::Webp);
        let second = session.begin_encode().unwrap();
        let err = EncodeError::EncodeFailure("webp unsupported".into());
        let done = session.complete(&second, Err(err.clone()));

        assert_eq!(done, Completion::Failed(err.clone()));
        assert_eq!(session.current().unwrap().reference, "blob:ok");
        assert_eq!(session.last_error(), Some(&err));
    }

    #[test]
    fn test_reset_releases_and_invalidates() {
        let mut session = loaded();
        let first = session.begin_encode().unwrap();
        session.complete(&first, fake_result(&first, "blob:1"));
        let pending = session.begin_encode().unwrap();

        assert_eq!(session.reset(), Some("blob:1".into()));
        assert!(session.current().is_none());
        assert_eq!(session.dimensions(), Dimensions::default());

        let done = session.complete(&pending, fake_result(&pending, "blob:2"));
        assert!(matches!(done, Completion::Stale { .. }));
    }

    #[test]
    fn test_reset_keeps_controls() {
        let mut session = loaded();
        session.set_quality_percent(30);
        session.set_format(OutputFormat::Png);
        session.set_lock_aspect(false);
        session.reset();

        assert_eq!(session.quality().as_percent(), 30);
        assert_eq!(session.format(), OutputFormat::Png);
        assert!(!session.lock_aspect());
    }

    #[test]
    fn test_new_source_invalidates_pending() {
        let mut session = loaded();
        let pending = session.begin_encode().unwrap();
        session.load_source(SourceInfo::new(
            "other.png",
            "image/png",
            10,
            Dimensions::new(300, 200),
        ));

        let done = session.complete(&pending, fake_result(&pending, "blob:old"));
        assert!(matches!(done, Completion::Stale { .. }));
        assert_eq!(session.dimensions(), Dimensions::new(300, 200));
    }

    #[test]
    fn test_download_name() {
        let mut session = loaded();
        assert_eq!(session.download_name(None), "photo.jpeg");
        session.set_format(OutputFormat::Webp);
        assert_eq!(session.download_name(Some("resized")), "resized.webp");
    }

    #[test]
    fn test_scenario_with_native_pipeline() {
        let mut session: SessionState<Vec<u8>> = SessionState::default();
        session.load_source(hd_info());
        session.edit_dimension(Axis::Width, "960");

        let source = SourceImage::new(1920, 1080, vec![200u8; 1920 * 1080 * 4]);
        let ticket = session.begin_encode().unwrap();
        assert_eq!(ticket.target.dimensions(), Dimensions::new(960, 540));

        let result = encode(&source, &ticket.target);
        session.complete(&ticket, result);

        let current = session.current().unwrap();
        assert_eq!((current.width, current.height), (960, 540));
        assert!(current.byte_size > 0);
    }
}
