//! Browser backend for the resize/encode pipeline.
//!
//! The surface is an off-document `<canvas>` of exactly the target size, the
//! source is drawn stretched over it, and the browser's `toBlob` encoder
//! compresses it. The encoded bytes stay in the browser as a `Blob`; the
//! result references them through an object URL.

use js_sys::{Function, Promise};
use resizer_core::{EncodeError, EncodedResult, TargetSpec};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url};

/// Resize and encode `image` on a canvas.
///
/// # Errors
///
/// `EncodeError::InvalidTarget` for zero-area targets, `EncodeError::EncodeFailure`
/// for anything the browser refuses (no document, no 2D context, encoder
/// returning no blob).
pub(crate) async fn encode_on_canvas(
    image: &HtmlImageElement,
    target: &TargetSpec,
) -> Result<EncodedResult<String>, EncodeError> {
    target.validate()?;

    let canvas = create_canvas(target.width, target.height)?;
    let ctx = context_2d(&canvas)?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        image,
        0.0,
        0.0,
        target.width as f64,
        target.height as f64,
    )
    .map_err(js_failure)?;

    let blob = to_blob(&canvas, target.format.mime_type(), target.quality.value()).await?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_failure)?;

    Ok(EncodedResult::new(
        url,
        blob.size() as u64,
        target.dimensions(),
    ))
}

/// Release an object URL created by [`encode_on_canvas`].
pub(crate) fn release(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        web_sys::console::warn_2(&JsValue::from_str("failed to revoke object URL"), &e);
    }
}

fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, EncodeError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| EncodeError::EncodeFailure("no document available".to_string()))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_failure)?
        .dyn_into()
        .map_err(|_| EncodeError::EncodeFailure("created element is not a canvas".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, EncodeError> {
    canvas
        .get_context("2d")
        .map_err(js_failure)?
        .ok_or_else(|| EncodeError::EncodeFailure("2D context unavailable".to_string()))?
        .dyn_into()
        .map_err(|_| EncodeError::EncodeFailure("unexpected context type".to_string()))
}

/// Await `canvas.toBlob(callback, mime, quality)`.
async fn to_blob(canvas: &HtmlCanvasElement, mime: &str, quality: f32) -> Result<Blob, EncodeError> {
    let promise = Promise::new(&mut |resolve: Function, reject: Function| {
        let callback = Closure::once_into_js(move |blob: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &blob);
        });
        if let Err(e) = canvas.to_blob_with_type_and_encoder_options(
            callback.unchecked_ref(),
            mime,
            &JsValue::from_f64(quality as f64),
        ) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    let value = JsFuture::from(promise).await.map_err(js_failure)?;
    if value.is_null() || value.is_undefined() {
        return Err(EncodeError::EncodeFailure(format!(
            "browser could not encode {}",
            mime
        )));
    }
    value
        .dyn_into::<Blob>()
        .map_err(|_| EncodeError::EncodeFailure("toBlob returned a non-Blob value".to_string()))
}

fn js_failure(err: JsValue) -> EncodeError {
    EncodeError::EncodeFailure(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
