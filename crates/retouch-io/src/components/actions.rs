//! Action buttons.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdSparkles;

/// Props for the [`DemoButton`] component.
#[derive(Props, Clone, PartialEq)]
pub struct DemoButtonProps {
    /// Called when the user asks for a demo image.
    on_demo: EventHandler<()>,
}

/// "Try Demo" button.
#[component]
pub fn DemoButton(props: DemoButtonProps) -> Element {
    rsx! {
        button {
            class: "button button-outline",
            r#type: "button",
            onclick: move |evt| {
                evt.stop_propagation();
                props.on_demo.call(());
            },
            Icon { width: 16, height: 16, icon: LdSparkles }
            "Try Demo"
        }
    }
}

/// Props for the [`ApplyButton`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ApplyButtonProps {
    /// Number of selected transformations.
    count: usize,
    /// Whether the source is still uploading.
    uploading: bool,
    /// Called when the user commits the selection.
    on_apply: EventHandler<()>,
}

/// Commit button, shown only while something is selected.
///
/// Stays enabled during an upload; committing then renders on the
/// sample image and the result is flagged as such.
#[component]
pub fn ApplyButton(props: ApplyButtonProps) -> Element {
    if props.count == 0 {
        return rsx! {};
    }
    rsx! {
        div { class: "apply-row",
            button {
                class: "button button-primary button-large",
                onclick: move |_| props.on_apply.call(()),
                Icon { width: 16, height: 16, icon: LdSparkles }
                "Apply AI Tools ({props.count})"
            }
        }
        if props.uploading {
            p { class: "apply-hint muted",
                "Still uploading. Applying now shows the result on a sample image."
            }
        }
    }
}
