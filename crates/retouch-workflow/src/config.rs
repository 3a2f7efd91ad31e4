//! Studio configuration.
//!
//! Endpoints, the demo gallery, and file acceptance rules. Every field
//! has a default so partial JSON overrides are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FileRejected};

/// A preselected example image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoImage {
    /// Short display name.
    pub name: String,
    /// Publicly reachable reference on the transformation service.
    pub url: String,
}

impl DemoImage {
    /// Create a demo image entry.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Configuration for one studio session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Endpoint issuing short-lived upload credentials.
    pub credential_endpoint: String,

    /// Endpoint receiving multipart uploads.
    pub upload_endpoint: String,

    /// Example images offered by "Try Demo".
    pub demo_images: Vec<DemoImage>,

    /// Index into `demo_images` used when a local upload is not
    /// available at commit time.
    pub fallback_demo: usize,

    /// Largest accepted local file, in bytes.
    pub max_upload_bytes: u64,

    /// Accepted file extensions, lowercase, without the dot.
    pub accepted_extensions: Vec<String>,

    /// Filename suggested when downloading a result.
    pub download_filename: String,
}

impl StudioConfig {
    /// Default credential endpoint, relative to the page origin.
    pub const DEFAULT_CREDENTIAL_ENDPOINT: &'static str = "/api/upload";

    /// Default upload endpoint.
    pub const DEFAULT_UPLOAD_ENDPOINT: &'static str = "https://upload.imagekit.io/api/v1/files/upload";

    /// Default size limit: 10 MiB.
    pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

    /// Default download filename.
    pub const DEFAULT_DOWNLOAD_FILENAME: &'static str = "ai-transformed-image.png";

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the gallery is empty, the fallback index
    /// is out of range, or the size limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let len = self.demo_images.len();
        if len == 0 {
            return Err(ConfigError::EmptyGallery);
        }
        if self.fallback_demo >= len {
            return Err(ConfigError::FallbackOutOfRange {
                index: self.fallback_demo,
                len,
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(())
    }

    /// The demo image used for fallback renderings.
    ///
    /// Falls back to the first gallery entry if the index is out of
    /// range; returns `None` only for an empty gallery.
    #[must_use]
    pub fn fallback_image(&self) -> Option<&DemoImage> {
        self.demo_images
            .get(self.fallback_demo)
            .or_else(|| self.demo_images.first())
    }

    /// Whether `name` has an accepted extension (case-insensitive).
    #[must_use]
    pub fn has_accepted_extension(&self, name: &str) -> bool {
        name.rsplit_once('.').is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && self
                    .accepted_extensions
                    .iter()
                    .any(|a| a.eq_ignore_ascii_case(ext))
        })
    }

    /// Validate a picked file by name and size.
    ///
    /// # Errors
    ///
    /// Returns [`FileRejected`] for an unaccepted extension, an empty file,
    /// or a file above `max_upload_bytes`.
    pub fn accept_file(&self, name: &str, size: u64) -> Result<(), FileRejected> {
        if !self.has_accepted_extension(name) {
            return Err(FileRejected::UnsupportedType(name.to_owned()));
        }
        if size == 0 {
            return Err(FileRejected::Empty(name.to_owned()));
        }
        if size > self.max_upload_bytes {
            return Err(FileRejected::TooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// `accept` attribute value for a file input (e.g. `.jpeg,.png`).
    #[must_use]
    pub fn accept_attribute(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            credential_endpoint: Self::DEFAULT_CREDENTIAL_ENDPOINT.to_owned(),
            upload_endpoint: Self::DEFAULT_UPLOAD_ENDPOINT.to_owned(),
            demo_images: vec![
                DemoImage::new("Portrait", "https://ik.imagekit.io/demo/img/girl.jpeg"),
                DemoImage::new("Product", "https://ik.imagekit.io/demo/img/plant.jpeg"),
                DemoImage::new("Street", "https://ik.imagekit.io/demo/default-image.jpg"),
            ],
            fallback_demo: 0,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            accepted_extensions: ["jpeg", "jpg", "png", "gif", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            download_filename: Self::DEFAULT_DOWNLOAD_FILENAME.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(StudioConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_gallery_rejected() {
        let config = StudioConfig {
            demo_images: Vec::new(),
            ..StudioConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyGallery));
        assert!(config.fallback_image().is_none());
    }

    #[test]
    fn fallback_index_out_of_range_rejected() {
        let config = StudioConfig {
            fallback_demo: 7,
            ..StudioConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FallbackOutOfRange { index: 7, len: 3 })
        );
        // Still resolves to something usable.
        assert_eq!(
            config.fallback_image(),
            StudioConfig::default().demo_images.first()
        );
    }

    #[test]
    fn zero_limit_rejected() {
        let config = StudioConfig {
            max_upload_bytes: 0,
            ..StudioConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroUploadLimit));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let config = StudioConfig::default();
        assert!(config.has_accepted_extension("cat.PNG"));
        assert!(config.has_accepted_extension("a.b.webp"));
        assert!(!config.has_accepted_extension("notes.txt"));
        assert!(!config.has_accepted_extension("png"));
    }

    #[test]
    fn bare_extension_is_not_a_filename() {
        let config = StudioConfig::default();
        assert!(!config.has_accepted_extension(".png"));
        assert_eq!(
            config.accept_file(".png", 1024),
            Err(FileRejected::UnsupportedType(".png".into()))
        );
    }

    #[test]
    fn accept_file_rules() {
        let config = StudioConfig::default();
        assert_eq!(config.accept_file("cat.jpg", 1024), Ok(()));
        assert_eq!(
            config.accept_file("cat.bmp", 1024),
            Err(FileRejected::UnsupportedType("cat.bmp".into()))
        );
        assert_eq!(
            config.accept_file("cat.jpg", 0),
            Err(FileRejected::Empty("cat.jpg".into()))
        );
        assert_eq!(
            config.accept_file("cat.jpg", StudioConfig::DEFAULT_MAX_UPLOAD_BYTES + 1),
            Err(FileRejected::TooLarge {
                size: StudioConfig::DEFAULT_MAX_UPLOAD_BYTES + 1,
                limit: StudioConfig::DEFAULT_MAX_UPLOAD_BYTES,
            })
        );
        assert_eq!(
            config.accept_file("cat.jpg", StudioConfig::DEFAULT_MAX_UPLOAD_BYTES),
            Ok(())
        );
    }

    #[test]
    fn accept_attribute_lists_extensions() {
        assert_eq!(
            StudioConfig::default().accept_attribute(),
            ".jpeg,.jpg,.png,.gif,.webp"
        );
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: StudioConfig =
            serde_json::from_str(r#"{"credential_endpoint": "https://example.test/auth"}"#)
                .unwrap();
        assert_eq!(config.credential_endpoint, "https://example.test/auth");
        assert_eq!(config.upload_endpoint, StudioConfig::DEFAULT_UPLOAD_ENDPOINT);
        assert_eq!(config.demo_images.len(), 3);
    }
}
