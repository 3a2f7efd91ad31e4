//! Preview of the picked source with its upload banner.

use dioxus::prelude::*;
use retouch_workflow::UploadNotice;

/// Props for the [`SourcePreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SourcePreviewProps {
    /// Displayable reference for the source.
    preview_url: String,
    /// Upload banner, if the source is a local file.
    #[props(default)]
    notice: Option<UploadNotice>,
}

/// Card showing the source image.
#[component]
pub fn SourcePreview(props: SourcePreviewProps) -> Element {
    rsx! {
        div { class: "card",
            h2 { class: "card-title", "Your Image" }
            match props.notice {
                Some(UploadNotice::Uploading { progress }) => rsx! {
                    div { class: "banner banner-info",
                        p { "Uploading to ImageKit..." }
                        UploadProgress { progress }
                    }
                },
                Some(UploadNotice::Uploaded) => rsx! {
                    div { class: "banner banner-success",
                        p { "Image uploaded! AI transformations will work on your actual image." }
                    }
                },
                Some(UploadNotice::Failed(ref err)) => rsx! {
                    div { class: "banner banner-error",
                        p { "Upload failed. Transformations will use demo image." }
                        p { class: "banner-detail", "{err}" }
                    }
                },
                None => rsx! {},
            }
            div { class: "image-frame",
                img { src: "{props.preview_url}", alt: "Preview" }
            }
        }
    }
}

/// Progress bar; indeterminate when no fraction is known.
#[component]
fn UploadProgress(progress: Option<f64>) -> Element {
    match progress {
        Some(fraction) => {
            let percent = (fraction * 100.0).round();
            rsx! {
                div { class: "progress",
                    div { class: "progress-bar", style: "width: {percent}%" }
                }
            }
        }
        None => rsx! {
            div { class: "progress progress-indeterminate",
                div { class: "progress-bar" }
            }
        },
    }
}
