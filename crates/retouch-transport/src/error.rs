//! Transport error type.

/// Longest response body excerpt kept in an error message.
pub const MAX_BODY_EXCERPT: usize = 512;

/// Errors from talking to the credential endpoint or the upload API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// Build a [`TransportError::Status`], truncating long bodies.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: excerpt(body),
        }
    }
}

/// At most [`MAX_BODY_EXCERPT`] bytes of `body`, cut on a char boundary.
fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_owned();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
