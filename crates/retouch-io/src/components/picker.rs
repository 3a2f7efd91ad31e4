//! Transformation list with toggle selection.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdCheck;
use retouch_workflow::{Catalog, SelectionSet};

use crate::icons::OptionIcon;

/// Props for the [`TransformationPicker`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TransformationPickerProps {
    /// Catalog to list the featured options from.
    catalog: Catalog,
    /// Currently selected ids.
    selection: SelectionSet,
    /// Called with the id of the clicked option.
    on_toggle: EventHandler<&'static str>,
}

/// Card listing the featured transformations.
///
/// Clicking an option toggles it; selected options show a check mark.
#[component]
pub fn TransformationPicker(props: TransformationPickerProps) -> Element {
    rsx! {
        div { class: "card",
            h2 { class: "card-title", "AI Tools" }
            div { class: "option-list",
                for option in props.catalog.featured() {
                    {
                        let selected = props.selection.contains(option.id);
                        let class = if selected { "option option-selected" } else { "option" };
                        let id = option.id;
                        rsx! {
                            div {
                                key: "{id}",
                                class: "{class}",
                                onclick: move |_| props.on_toggle.call(id),
                                div { class: "option-label",
                                    OptionIcon { tag: option.icon }
                                    span { "{option.name}" }
                                }
                                if selected {
                                    Icon { width: 16, height: 16, icon: LdCheck }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
