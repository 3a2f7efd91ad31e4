//! Local previews of picked files via Blob object URLs.
//!
//! A picked file is shown immediately from memory while its upload
//! runs. Object URLs hold the bytes alive until revoked, so callers
//! revoke the previous preview when the source changes.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur while creating a preview URL.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for PreviewError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// MIME type for a filename, judged by its extension.
///
/// Unknown extensions map to `application/octet-stream`; the browser
/// sniffs image content regardless.
#[must_use]
pub fn mime_for(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return "application/octet-stream";
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Create an object URL displaying `bytes` as the image file `name`.
///
/// The returned URL must be revoked via [`revoke_object_url`] when no
/// longer needed.
///
/// # Errors
///
/// Returns [`PreviewError::JsError`] if Blob or URL creation fails.
pub fn object_url_for(bytes: &[u8], name: &str) -> Result<String, PreviewError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_for(name));
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Release an object URL created by [`object_url_for`].
///
/// Non-object URLs (demo images) are ignored.
pub fn revoke_object_url(url: &str) {
    if url.starts_with("blob:") {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}
