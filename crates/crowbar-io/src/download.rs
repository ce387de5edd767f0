//! File download via Blob URLs.
//!
//! Triggers a download by creating a `Blob`, generating an object URL,
//! and programmatically clicking a temporary `<a>` element.  The object
//! URL is released a short delay after the click so the browser has
//! picked it up.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use crowbar_export::DownloadRequest;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

use crate::popover::CROWBAR_CLASS;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Offer `request` to the user as a file download.
///
/// `release_delay_ms` is how long the object URL stays valid after the
/// click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(request: &DownloadRequest<'_>, release_delay_ms: u32) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(request.contents));

    let opts = BlobPropertyBag::new();
    opts.set_type(request.mime_type);

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    // Tagged so a later run's cleanup removes it with the popover.
    anchor.set_class_name(CROWBAR_CLASS);
    anchor.set_href(&url);
    anchor.set_download(&request.filename);
    anchor.style().set_property("display", "none")?;

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    log::info!("downloading {}", request.filename);

    Timeout::new(release_delay_ms, move || {
        let _ = web_sys::Url::revoke_object_url(&url);
    })
    .forget();

    Ok(())
}
