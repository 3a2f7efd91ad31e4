//! Reachability check for a transformed reference.
//!
//! The diagnostic counterpart of the viewer's load/error events: fetch
//! the reference once and report what came back.

use serde::Serialize;

use crate::error::TransportError;

/// What a single fetch of a reference returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// The fetched reference.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Body length in bytes.
    pub bytes: usize,
}

impl ProbeReport {
    /// Whether a viewer would have displayed the response as an image.
    #[must_use]
    pub fn loaded(&self) -> bool {
        (200..300).contains(&self.status)
            && self.bytes > 0
            && self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Fetch `url` and report status, content type and size.
///
/// A non-success status is reported, not returned as an error.
///
/// # Errors
///
/// Returns [`TransportError::Http`] if the request cannot be sent or the
/// body cannot be read.
pub async fn probe(http: &reqwest::Client, url: &str) -> Result<ProbeReport, TransportError> {
    let response = http.get(url).send().await?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = response.bytes().await?.len();
    let report = ProbeReport {
        url: url.to_owned(),
        status,
        content_type,
        bytes,
    };
    tracing::debug!(?report, loaded = report.loaded(), "probe finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: u16, content_type: Option<&str>, bytes: usize) -> ProbeReport {
        ProbeReport {
            url: "https://cdn/x.png?tr=e-bgremove".into(),
            status,
            content_type: content_type.map(str::to_owned),
            bytes,
        }
    }

    #[test]
    fn image_response_is_loaded() {
        assert!(report(200, Some("image/png"), 1024).loaded());
    }

    #[test]
    fn error_status_is_not_loaded() {
        assert!(!report(404, Some("image/png"), 1024).loaded());
    }

    #[test]
    fn non_image_body_is_not_loaded() {
        assert!(!report(200, Some("text/html; charset=utf-8"), 1024).loaded());
        assert!(!report(200, None, 1024).loaded());
    }

    #[test]
    fn empty_body_is_not_loaded() {
        assert!(!report(200, Some("image/webp"), 0).loaded());
    }
}
