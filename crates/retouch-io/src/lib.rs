//! retouch-io: Browser I/O and Dioxus component library.
//!
//! Handles file picking, object-URL previews, downloads of the
//! transformed image, and provides the UI components for the retouch
//! web application.

pub mod components;
pub mod download;
pub mod icons;
pub mod preview;

pub use components::{
    ApplyButton, DemoButton, FileUpload, ResultViewer, SourcePreview, TransformationPicker,
};
pub use icons::OptionIcon;
