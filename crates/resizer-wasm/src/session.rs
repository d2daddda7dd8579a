//! Resize session bindings.
//!
//! `ResizeSession` is the single object the page talks to: it holds the
//! loaded image and the control values, and runs the canvas pipeline.
//!
//! # Example
//!
//! ```typescript
//! const session = new ResizeSession();
//! session.load_source(img, file.name, file.type, file.size);
//!
//! async function refresh() {
//!   const result = await session.process();
//!   if (result) preview.src = result.url; // null: superseded by a newer call
//! }
//!
//! widthInput.oninput = (e) => { if (session.set_width(e.target.value)) refresh(); };
//! qualitySlider.oninput = (e) => { if (session.set_quality(+e.target.value)) refresh(); };
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use resizer_core::dimensions::Axis;
use resizer_core::{
    validate_mime_type, Completion, Dimensions, OutputFormat, SessionConfig, SessionState,
    SourceInfo,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlAnchorElement, HtmlImageElement};

use crate::canvas::{encode_on_canvas, release};
use crate::types::JsEncodedResult;

struct Inner {
    state: SessionState<String>,
    image: Option<HtmlImageElement>,
}

/// One image being resized.
///
/// Every `process()` call starts a full encode with the current settings.
/// Calls may overlap; only the most recent one ends up displayed and the
/// others resolve to `null`.
#[wasm_bindgen]
pub struct ResizeSession {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl ResizeSession {
    /// Create a session.
    ///
    /// # Arguments
    /// * `config` - Optional `{ defaultQualityPercent, defaultFormat, lockAspect, presets }`;
    ///   missing fields keep their defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ResizeSession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };

        Ok(ResizeSession {
            inner: Rc::new(RefCell::new(Inner {
                state: SessionState::new(config),
                image: None,
            })),
        })
    }

    /// Load a decoded image.
    ///
    /// # Errors
    /// Returns the user-facing message if `mime_type` is not JPEG, PNG or WebP.
    pub fn load_source(
        &self,
        image: HtmlImageElement,
        file_name: &str,
        mime_type: &str,
        file_size: f64,
    ) -> Result<(), JsValue> {
        validate_mime_type(mime_type).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let dimensions = Dimensions::new(image.natural_width(), image.natural_height());
        let info = SourceInfo::new(file_name, mime_type, file_size.max(0.0) as u64, dimensions);

        let mut inner = self.inner.borrow_mut();
        inner.image = Some(image);
        if let Some(url) = inner.state.load_source(info) {
            release(&url);
        }
        Ok(())
    }

    /// Drop the image and its result. Quality, format and aspect lock are kept.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.image = None;
        if let Some(url) = inner.state.reset() {
            release(&url);
        }
    }

    /// Select a preset id, or `"custom"`. Returns whether the size changed.
    pub fn select_preset(&self, id: &str) -> Result<bool, JsValue> {
        self.inner
            .borrow_mut()
            .state
            .select_preset(id)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply the width input's raw value. Returns whether the size changed.
    pub fn set_width(&self, raw: &str) -> bool {
        self.inner.borrow_mut().state.edit_dimension(Axis::Width, raw)
    }

    /// Apply the height input's raw value. Returns whether the size changed.
    pub fn set_height(&self, raw: &str) -> bool {
        self.inner.borrow_mut().state.edit_dimension(Axis::Height, raw)
    }

    pub fn set_lock_aspect(&self, lock: bool) {
        self.inner.borrow_mut().state.set_lock_aspect(lock);
    }

    /// Set quality from the slider (10-100). Returns whether it changed.
    pub fn set_quality(&self, percent: u8) -> bool {
        self.inner.borrow_mut().state.set_quality_percent(percent)
    }

    /// Set the output format (`jpeg`, `png` or `webp`). Returns whether it changed.
    pub fn set_format(&self, format: &str) -> Result<bool, JsValue> {
        let format: OutputFormat = format
            .parse()
            .map_err(|e: resizer_core::format::UnknownFormat| JsValue::from_str(&e.to_string()))?;
        Ok(self.inner.borrow_mut().state.set_format(format))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.borrow().state.dimensions().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.borrow().state.dimensions().height
    }

    #[wasm_bindgen(getter)]
    pub fn lock_aspect(&self) -> bool {
        self.inner.borrow().state.lock_aspect()
    }

    /// Quality in percent.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.borrow().state.quality().as_percent()
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.borrow().state.format().to_string()
    }

    /// Selected preset id, `"custom"` after manual edits.
    #[wasm_bindgen(getter)]
    pub fn preset(&self) -> String {
        self.inner.borrow().state.mode().id().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.inner.borrow().state.is_processing()
    }

    /// Message of the latest failed encode, if any.
    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.borrow().state.last_error().map(|e| e.to_string())
    }

    /// Presets offered by this session as `{ id, name, width, height }[]`.
    pub fn presets(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.borrow().state.config().presets)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Info panel data for the loaded file, or `undefined`.
    pub fn source_info(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.borrow().state.source())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The displayed result, if any.
    pub fn current(&self) -> Option<JsEncodedResult> {
        self.inner.borrow().state.current().map(JsEncodedResult::from)
    }

    /// Encode with the current settings.
    ///
    /// Resolves to the new `JsEncodedResult`, or `null` when there is nothing
    /// valid to encode (no image, a zero dimension) or a newer call has
    /// superseded this one. Rejects with a message when the latest encode
    /// fails; the previous result stays current.
    pub fn process(&self) -> Promise {
        let inner = Rc::clone(&self.inner);

        future_to_promise(async move {
            let (ticket, image) = {
                let mut guard = inner.borrow_mut();
                let Some(image) = guard.image.clone() else {
                    return Ok(JsValue::NULL);
                };
                let Some(ticket) = guard.state.begin_encode() else {
                    return Ok(JsValue::NULL);
                };
                (ticket, image)
            };

            let result = encode_on_canvas(&image, &ticket.target).await;
            let completion = inner.borrow_mut().state.complete(&ticket, result);

            match completion {
                Completion::Applied { released } => {
                    if let Some(url) = released {
                        release(&url);
                    }
                    Ok(inner
                        .borrow()
                        .state
                        .current()
                        .map(|r| JsValue::from(JsEncodedResult::from(r)))
                        .unwrap_or(JsValue::NULL))
                }
                Completion::Stale { discarded } => {
                    if let Some(url) = discarded {
                        release(&url);
                    }
                    Ok(JsValue::NULL)
                }
                Completion::Failed(err) => {
                    let message = err.to_string();
                    web_sys::console::error_1(&JsValue::from_str(&message));
                    Err(JsValue::from_str(&message))
                }
            }
        })
    }

    /// File name the download will use, `<stem>.<format>`.
    pub fn download_name(&self, stem: Option<String>) -> String {
        self.inner.borrow().state.download_name(stem.as_deref())
    }

    /// Save the current result through a temporary download link.
    ///
    /// # Arguments
    /// * `stem` - File name without extension; defaults to the uploaded file's stem
    pub fn download(&self, stem: Option<String>) -> Result<(), JsValue> {
        let inner = self.inner.borrow();
        let Some(current) = inner.state.current() else {
            return Ok(());
        };
        let file_name = inner.state.download_name(stem.as_deref());

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        link.set_href(&current.reference);
        link.set_download(&file_name);
        body.append_child(&link)?;
        link.click();
        body.remove_child(&link)?;
        Ok(())
    }
}

/// WASM-specific tests that require a browser.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_defaults() {
        let session = ResizeSession::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(session.quality(), 80);
        assert_eq!(session.format(), "jpeg");
        assert!(session.lock_aspect());
        assert_eq!(session.preset(), "custom");
    }

    #[wasm_bindgen_test]
    fn test_set_format_rejects_unknown() {
        let session = ResizeSession::new(JsValue::NULL).unwrap();
        assert!(session.set_format("gif").is_err());
        assert_eq!(session.set_format("webp"), Ok(true));
    }

    #[wasm_bindgen_test]
    async fn test_process_without_source_resolves_null() {
        let session = ResizeSession::new(JsValue::UNDEFINED).unwrap();
        let value = wasm_bindgen_futures::JsFuture::from(session.process())
            .await
            .unwrap();
        assert!(value.is_null());
    }

    #[wasm_bindgen_test]
    fn test_load_source_rejects_gif() {
        let session = ResizeSession::new(JsValue::UNDEFINED).unwrap();
        let img = HtmlImageElement::new().unwrap();
        let err = session.load_source(img, "anim.gif", "image/gif", 10.0).unwrap_err();
        assert_eq!(
            err.as_string().unwrap(),
            "Please upload a valid image (JPEG, PNG, or WebP)"
        );
    }
}
