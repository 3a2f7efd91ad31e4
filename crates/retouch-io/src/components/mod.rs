//! Dioxus UI components for retouch.
//!
//! Provides the drop zone and file picker, the demo button, the source
//! preview with its upload banner, the transformation list, the apply
//! button, and the result viewer.

mod actions;
mod picker;
mod result;
mod source;
mod upload;

pub use actions::{ApplyButton, DemoButton};
pub use picker::TransformationPicker;
pub use result::ResultViewer;
pub use source::SourcePreview;
pub use upload::FileUpload;
