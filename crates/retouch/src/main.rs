use dioxus::prelude::*;
use retouch_io::preview::{object_url_for, revoke_object_url};
use retouch_io::{
    ApplyButton, DemoButton, FileUpload, ResultViewer, SourcePreview, TransformationPicker,
};
use retouch_transport::ImageKitClient;
use retouch_workflow::{ImageSource, LocalFile, RenderTicket, Stage, StudioConfig, Workflow};

fn main() {
    tracing_wasm::set_as_global_default();
    dioxus::launch(app);
}

/// Default configuration with endpoints resolved against the page origin.
///
/// The browser HTTP client needs absolute URLs; the credential endpoint
/// is served by the same origin as the app.
fn studio_config() -> StudioConfig {
    let mut config = StudioConfig::default();
    if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
        config.credential_endpoint = absolute(&origin, &config.credential_endpoint);
        config.upload_endpoint = absolute(&origin, &config.upload_endpoint);
    }
    config
}

fn absolute(origin: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{origin}{endpoint}")
    } else {
        endpoint.to_owned()
    }
}

/// "JPG, PNG, WEBP up to 10MB" style summary of the acceptance rules.
fn accept_hint(config: &StudioConfig) -> String {
    let types = config
        .accepted_extensions
        .iter()
        .map(|ext| ext.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    let megabytes = config.max_upload_bytes / (1024 * 1024);
    format!("{types} up to {megabytes}MB")
}

/// Object URL of the current local source, if any.
fn local_preview(workflow: &Workflow) -> Option<String> {
    match workflow.source() {
        Some(ImageSource::LocalFile(file)) => Some(file.preview_url().to_owned()),
        _ => None,
    }
}

/// Root application component.
///
/// Owns the session in a single signal. Uploads run as spawned tasks
/// that feed their events back into the session; the session discards
/// events from superseded uploads.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut workflow = use_signal(|| {
        Workflow::new(studio_config()).unwrap_or_else(|err| {
            tracing::error!(%err, "invalid configuration, using defaults");
            Workflow::default()
        })
    });
    let client = use_hook(|| ImageKitClient::from_config(workflow.peek().config()));
    let mut error = use_signal(|| Option::<String>::None);

    // --- File pick handler ---
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if let Err(rejected) = workflow.peek().config().accept_file(&name, size) {
            tracing::info!(file = %name, %rejected, "file rejected");
            error.set(Some(rejected.to_string()));
            return;
        }
        let preview = match object_url_for(&bytes, &name) {
            Ok(url) => url,
            Err(e) => {
                error.set(Some(format!("Failed to preview file: {e}")));
                return;
            }
        };

        let previous = local_preview(&workflow.peek());
        let picked = workflow
            .write()
            .pick_local_file(LocalFile::new(name, bytes, preview.clone()));
        match picked {
            Ok(job) => {
                error.set(None);
                if let Some(url) = previous {
                    revoke_object_url(&url);
                }
                let client = client.clone();
                spawn(async move {
                    job.run(&client, move |event| {
                        workflow.write().apply_upload_event(event);
                    })
                    .await;
                });
            }
            Err(rejected) => {
                revoke_object_url(&preview);
                error.set(Some(rejected.to_string()));
            }
        }
    };

    // --- Demo handler ---
    let on_demo = move |()| {
        let previous = local_preview(&workflow.peek());
        workflow.write().pick_demo();
        if let Some(url) = previous {
            revoke_object_url(&url);
        }
        error.set(None);
    };

    // --- Selection and commit ---
    let on_toggle = move |id: &'static str| {
        workflow.write().toggle_transformation(id);
    };

    let on_apply = move |()| {
        if let Err(err) = workflow.write().commit() {
            tracing::debug!(%err, "commit ignored");
        }
    };

    // --- Viewer callbacks ---
    let on_ready = move |ticket: RenderTicket| {
        workflow.write().on_render_ready(&ticket);
    };

    let on_failed = move |ticket: RenderTicket| {
        workflow.write().on_render_failed(&ticket);
    };

    let on_download = move |()| {
        let wf = workflow.peek();
        let Some(result) = wf.result() else {
            return;
        };
        if let Err(e) =
            retouch_io::download::trigger_download(result.requested_url(), &wf.config().download_filename)
        {
            tracing::warn!(error = %e, "download failed");
            error.set(Some(format!("Download failed: {e}")));
        }
    };

    let mut on_reset = move |()| {
        let previous = local_preview(&workflow.peek());
        workflow.write().reset();
        if let Some(url) = previous {
            revoke_object_url(&url);
        }
        error.set(None);
    };

    // --- Layout ---
    let wf = workflow.read();
    let stage = wf.stage();
    let uploading = wf.upload_state().is_in_flight();

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/style.css") }

        div { class: "page",
            header { class: "header",
                h1 { "AI Image Studio" }
                p { class: "muted", "Transform your images with AI" }
            }

            match wf.source() {
                None => rsx! {
                    div { class: "card",
                        FileUpload {
                            accept: wf.config().accept_attribute(),
                            hint: accept_hint(wf.config()),
                            error: error(),
                            on_upload,
                            DemoButton { on_demo }
                        }
                    }
                },
                Some(source) => rsx! {
                    div { class: "workspace",
                        div { class: "source-grid",
                            SourcePreview {
                                preview_url: source.preview_url().to_owned(),
                                notice: wf.upload_notice(),
                            }
                            TransformationPicker {
                                catalog: *wf.catalog(),
                                selection: wf.selection().clone(),
                                on_toggle,
                            }
                        }

                        if let Some(ref err) = error() {
                            div { class: "banner banner-error",
                                p { "{err}" }
                            }
                        }

                        ApplyButton {
                            count: wf.selection().len(),
                            uploading,
                            on_apply,
                        }

                        if matches!(stage, Stage::Processing | Stage::Resulted) {
                            if let Some(result) = wf.result() {
                                ResultViewer {
                                    result: result.clone(),
                                    original_url: source.preview_url().to_owned(),
                                    on_ready,
                                    on_failed,
                                    on_download,
                                    on_reset,
                                }
                            }
                        } else {
                            div { class: "button-row",
                                button {
                                    class: "button button-outline",
                                    onclick: move |_| on_reset(()),
                                    "New Image"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
