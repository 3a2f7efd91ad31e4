//! Result viewer: original and transformed images side by side.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCheck, LdDownload, LdLoader, LdRotateCcw, LdSparkles};
use retouch_workflow::{RenderState, RenderTicket, TransformResult};

/// Props for the [`ResultViewer`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultViewerProps {
    /// The committed result.
    result: TransformResult,
    /// Displayable reference for the original.
    original_url: String,
    /// The transformed image finished loading.
    on_ready: EventHandler<RenderTicket>,
    /// The transformed image failed to load.
    on_failed: EventHandler<RenderTicket>,
    /// Download the transformed image.
    on_download: EventHandler<()>,
    /// Start over with a new image.
    on_reset: EventHandler<()>,
}

/// Shows the transformed image and reports its load outcome.
///
/// The `<img>` is keyed by the result's ticket, so committing the same
/// reference again mounts a fresh element and yields a fresh load event.
#[component]
pub fn ResultViewer(props: ResultViewerProps) -> Element {
    let result = &props.result;
    let state = result.render_state();
    let provenance = result.provenance();
    let badge = provenance.badge();
    let message = provenance.message();
    let url = result.requested_url().to_owned();
    let generation = result.ticket().generation();
    let ready_ticket = result.ticket().clone();
    let failed_ticket = result.ticket().clone();

    let img_class = if state == RenderState::Failed {
        "transformed transformed-failed"
    } else {
        "transformed"
    };
    let img_alt = if state == RenderState::Failed {
        "Transformation failed to load"
    } else {
        "Transformed"
    };

    rsx! {
        div { class: "result",
            if state == RenderState::Ready {
                div { class: "card card-success",
                    div { class: "success-icon",
                        Icon { width: 24, height: 24, icon: LdCheck }
                    }
                    h3 { "AI Transformation Complete!" }
                    p { class: "muted", "{message}" }
                }
            }

            div { class: "result-grid",
                div { class: "card",
                    h2 { class: "card-title", "Original" }
                    div { class: "image-frame",
                        img { src: "{props.original_url}", alt: "Original" }
                    }
                }

                div { class: "card",
                    h2 { class: "card-title",
                        "AI Transformed"
                        span { class: "badge",
                            Icon { width: 12, height: 12, icon: LdSparkles }
                            "{badge}"
                        }
                    }
                    div { class: "image-frame checkerboard",
                        if state == RenderState::Pending {
                            div { class: "loading-overlay",
                                div { class: "spin",
                                    Icon { width: 32, height: 32, icon: LdLoader }
                                }
                                p { class: "loading-title", "Processing transformation..." }
                                p { class: "loading-hint", "This may take 10-60 seconds" }
                                div { class: "progress progress-indeterminate",
                                    div { class: "progress-bar" }
                                }
                            }
                        }
                        img {
                            key: "{generation}",
                            class: "{img_class}",
                            src: "{url}",
                            alt: "{img_alt}",
                            onload: move |_| props.on_ready.call(ready_ticket.clone()),
                            onerror: move |_| props.on_failed.call(failed_ticket.clone()),
                        }
                    }

                    match state {
                        RenderState::Pending => rsx! {
                            div { class: "url-box url-box-pending",
                                p { "ImageKit is processing your transformation..." }
                            }
                        },
                        RenderState::Ready => rsx! {
                            div { class: "url-box",
                                p { class: "mono", "Transformation URL: {url}" }
                            }
                        },
                        RenderState::Failed => rsx! {
                            div { class: "url-box url-box-error",
                                p { "The transformed image failed to load. Apply again or start over." }
                                p { class: "mono", "{url}" }
                            }
                        },
                    }

                    if let Some(note) = provenance.fallback_note() {
                        div { class: "banner banner-warning",
                            p { "{note}" }
                        }
                    }
                }
            }

            div { class: "button-row",
                button {
                    class: "button button-primary button-large",
                    onclick: move |_| props.on_download.call(()),
                    Icon { width: 16, height: 16, icon: LdDownload }
                    "Download"
                }
                button {
                    class: "button button-outline button-large",
                    onclick: move |_| props.on_reset.call(()),
                    Icon { width: 16, height: 16, icon: LdRotateCcw }
                    "New Image"
                }
            }
        }
    }
}
