//! Error taxonomy for the workflow engine.
//!
//! Upload failures never abort a session: they are absorbed into
//! [`UploadState::Failed`](crate::upload::UploadState::Failed) and the
//! next commit falls back to a demo image. Render failures are shown to
//! the user as-is. Commit rejections are local no-ops.

/// Why a background upload did not produce a remote reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The credential endpoint refused or could not be reached.
    #[error("failed to obtain upload credentials: {0}")]
    Auth(String),

    /// The upload request itself failed.
    #[error("upload failed: {0}")]
    Transport(String),

    /// The upload succeeded at the transport level but the response
    /// carried no URL.
    #[error("upload response missing URL")]
    MissingUrl,
}

impl UploadError {
    /// Short machine-readable reason (`"auth"`, `"transport"`, `"missing-url"`).
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Transport(_) => "transport",
            Self::MissingUrl => "missing-url",
        }
    }
}

/// [`UploadCoordinator::start`](crate::upload::UploadCoordinator::start)
/// was called while a previous upload had not been reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an upload is already in progress or finished; reset first")]
pub struct UploadBusy;

/// Why a commit was rejected. Rejections leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// No image source has been picked.
    #[error("no image selected")]
    NoSource,

    /// The selection set is empty.
    #[error("no transformations selected")]
    EmptySelection,
}

/// The transformed reference failed to load in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transformed image failed to load: {url}")]
pub struct RenderError {
    /// The reference that failed.
    pub url: String,
}

/// A picked file that cannot become an image source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejected {
    /// The extension is not in the accepted set.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// The file has no content.
    #[error("file is empty: {0}")]
    Empty(String),

    /// The file exceeds the configured size limit.
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Invalid [`StudioConfig`](crate::config::StudioConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No demo images configured.
    #[error("demo gallery is empty")]
    EmptyGallery,

    /// The fallback demo index does not point into the gallery.
    #[error("fallback demo index {index} out of range for {len} demo images")]
    FallbackOutOfRange {
        /// Configured index.
        index: usize,
        /// Gallery length.
        len: usize,
    },

    /// The upload size limit is zero.
    #[error("maximum upload size must be greater than zero")]
    ZeroUploadLimit,
}
