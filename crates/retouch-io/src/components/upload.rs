//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// `accept` attribute for the file input, e.g. `.jpg,.png`.
    accept: String,
    /// Short description of accepted files shown under the title.
    hint: String,
    /// Rejection message for the last picked file, if any.
    #[props(default)]
    error: Option<String>,
    /// Called with the raw file bytes and filename of the picked file.
    on_upload: EventHandler<(Vec<u8>, String)>,
    /// Extra content rendered next to the picker button.
    children: Element,
}

/// A drag-and-drop zone with a file picker button.
///
/// Only the first file of a pick or drop is used. Extension and size
/// checks happen in the session; this component only reads bytes.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut read_error = use_signal(|| Option::<String>::None);

    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        match file.read_bytes().await {
            Ok(bytes) => {
                read_error.set(None);
                props.on_upload.call((bytes.to_vec(), name));
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "failed to read picked file");
                read_error.set(Some(format!("Failed to read file: {e}")));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "drop-zone drop-zone-active"
    } else {
        "drop-zone"
    };
    let title = if dragging() {
        "Drop your image"
    } else {
        "Upload an image"
    };
    let error = read_error().or_else(|| props.error.clone());

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            div { class: "drop-zone-icon",
                Icon { width: 32, height: 32, icon: LdUpload }
            }
            h3 { "{title}" }
            p { class: "muted", "{props.hint}" }

            if let Some(ref err) = error {
                p { class: "text-error", "{err}" }
            }

            div { class: "button-row",
                label { class: "button button-primary",
                    input {
                        r#type: "file",
                        accept: "{props.accept}",
                        class: "hidden",
                        onchange: handle_files,
                    }
                    "Choose File"
                }
                {props.children}
            }
        }
    }
}
