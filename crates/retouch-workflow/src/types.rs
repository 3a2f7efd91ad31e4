//! Shared session types.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::config::DemoImage;

/// A file the user picked locally.
///
/// The bytes are reference-counted so the background upload and the
/// session can share them without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    bytes: Rc<[u8]>,
    preview_url: String,
}

impl LocalFile {
    /// Create a local file.
    ///
    /// `preview_url` is a reference the viewer can display directly
    /// (in the browser, an object URL for the file's Blob).
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Rc<[u8]>>, preview_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            preview_url: preview_url.into(),
        }
    }

    /// Original filename.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw file content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reference for displaying the local preview.
    #[must_use]
    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("preview_url", &self.preview_url)
            .finish()
    }
}

/// The image the session currently works on. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file picked by the user; uploaded in the background.
    LocalFile(LocalFile),
    /// A preselected example already hosted by the service.
    Demo(DemoImage),
}

impl ImageSource {
    /// Reference the viewer should show as the "original".
    #[must_use]
    pub fn preview_url(&self) -> &str {
        match self {
            Self::LocalFile(file) => file.preview_url(),
            Self::Demo(demo) => &demo.url,
        }
    }

    /// Whether this is a demo source.
    #[must_use]
    pub const fn is_demo(&self) -> bool {
        matches!(self, Self::Demo(_))
    }
}

/// Why the user's own image could not be used at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// The upload was still running.
    UploadPending,
    /// The upload had failed.
    UploadFailed,
}

/// Which image a committed result was actually computed from.
///
/// Recorded at commit time so the UI never has to infer it from the
/// source kind and upload outcome after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// The user chose a demo image.
    Demo,
    /// The user's own upload.
    Uploaded,
    /// The user's upload was not available; a demo image stood in.
    Fallback(FallbackReason),
}

impl Provenance {
    /// Short badge label for the result panel.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Demo => "Demo",
            Self::Uploaded => "Your Image",
            Self::Fallback(_) => "Sample",
        }
    }

    /// One-line description of what was transformed.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Demo => "Demo image has been transformed",
            Self::Uploaded => "Your uploaded image has been transformed",
            Self::Fallback(_) => "Transformation demonstrated on sample image",
        }
    }

    /// Warning shown under a fallback result explaining the substitution.
    #[must_use]
    pub const fn fallback_note(self) -> Option<&'static str> {
        match self {
            Self::Fallback(FallbackReason::UploadPending) => {
                Some("Your image was not uploaded yet, showing sample transformation")
            }
            Self::Fallback(FallbackReason::UploadFailed) => {
                Some("Demo result - upload failed, showing sample transformation")
            }
            Self::Demo | Self::Uploaded => None,
        }
    }

    /// Whether the result is a fallback rendering.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// The transformation ids the user has chosen.
///
/// Membership is unique. Ids keep the order they were first added in,
/// which is the order their fragments are chained; equality ignores
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet(IndexSet<String>);

impl SelectionSet {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Returns `true` if `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.shift_remove(id) {
            false
        } else {
            self.0.insert(id.to_owned());
            true
        }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Selected ids in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every id.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> FromIterator<&'a str> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("bg-removal"));
        assert!(selection.contains("bg-removal"));
        assert!(!selection.toggle("bg-removal"));
        assert!(selection.is_empty());
    }

    #[test]
    fn iteration_follows_first_insertion() {
        let mut selection = SelectionSet::new();
        selection.toggle("smart-crop");
        selection.toggle("bg-removal");
        selection.toggle("upscale");
        selection.toggle("bg-removal");
        assert_eq!(selection.iter().collect::<Vec<_>>(), ["smart-crop", "upscale"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: SelectionSet = ["a", "b"].into_iter().collect();
        let b: SelectionSet = ["b", "a"].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn provenance_labels() {
        assert_eq!(Provenance::Demo.badge(), "Demo");
        assert_eq!(Provenance::Uploaded.badge(), "Your Image");
        let pending = Provenance::Fallback(FallbackReason::UploadPending);
        assert_eq!(pending.badge(), "Sample");
        assert!(pending.is_fallback());
        assert!(!Provenance::Uploaded.is_fallback());
    }

    #[test]
    fn fallback_note_names_the_reason() {
        let pending = Provenance::Fallback(FallbackReason::UploadPending);
        let failed = Provenance::Fallback(FallbackReason::UploadFailed);
        assert!(pending.fallback_note().unwrap().contains("not uploaded yet"));
        assert!(failed.fallback_note().unwrap().contains("upload failed"));
        assert_eq!(Provenance::Demo.fallback_note(), None);
        assert_eq!(Provenance::Uploaded.fallback_note(), None);
    }

    #[test]
    fn local_file_debug_omits_bytes() {
        let file = LocalFile::new("cat.png", vec![1_u8; 4096], "blob:cat");
        let debug = format!("{file:?}");
        assert!(debug.contains("len: 4096"));
        assert!(debug.len() < 200);
    }

    #[test]
    fn preview_urls() {
        let file = LocalFile::new("cat.png", vec![1_u8], "blob:cat");
        assert_eq!(ImageSource::LocalFile(file).preview_url(), "blob:cat");
        let demo = DemoImage::new("Plant", "https://cdn/plant.jpeg");
        assert_eq!(ImageSource::Demo(demo).preview_url(), "https://cdn/plant.jpeg");
    }
}
