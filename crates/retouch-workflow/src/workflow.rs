//! The session orchestrator.
//!
//! [`Workflow`] owns the whole state bundle of one editing session:
//! the active [`ImageSource`], the [`SelectionSet`], the
//! [`UploadCoordinator`] and the [`RenderObserver`]. Every user action and
//! every asynchronous completion goes through one of its methods, and each
//! method replaces the affected slice of state in one step.
//!
//! ```text
//! Empty ──pick──▶ Ready ──toggle──▶ Configuring ──commit──▶ Processing
//!   ▲                                    ▲                      │
//!   │                                    └──────toggle──────────┤ load/error
//!   └────────────────reset──────────────────────────────── Resulted
//! ```
//!
//! The stage is derived from the state bundle rather than stored, so it
//! can never disagree with it.

use rand::Rng;

use crate::catalog::Catalog;
use crate::chain;
use crate::config::{DemoImage, StudioConfig};
use crate::error::{CommitError, ConfigError, FileRejected, UploadError};
use crate::render::{RenderObserver, RenderState, RenderTicket, TransformResult};
use crate::types::{FallbackReason, ImageSource, LocalFile, Provenance, SelectionSet};
use crate::upload::{UploadCoordinator, UploadEvent, UploadJob, UploadState};

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// No image picked.
    Empty,
    /// An image is picked, nothing selected.
    Ready,
    /// At least one transformation selected, not committed.
    Configuring,
    /// Committed; waiting for the transformed image to load.
    Processing,
    /// The transformed image loaded or failed to load.
    Resulted,
}

/// Upload banner for the current source.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadNotice {
    /// Upload in flight. `None` progress means indeterminate.
    Uploading {
        /// Last reported fraction.
        progress: Option<f64>,
    },
    /// Transformations will run on the user's own image.
    Uploaded,
    /// Transformations will run on the fallback demo image.
    Failed(UploadError),
}

/// One editing session.
#[derive(Debug)]
pub struct Workflow {
    config: StudioConfig,
    catalog: Catalog,
    source: Option<ImageSource>,
    selection: SelectionSet,
    uploads: UploadCoordinator,
    render: RenderObserver,
}

impl Workflow {
    /// Start an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: StudioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog: Catalog::standard(),
            source: None,
            selection: SelectionSet::new(),
            uploads: UploadCoordinator::new(),
            render: RenderObserver::new(),
        })
    }

    // ───────────────────────── Accessors ─────────────────────────

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Transformation catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Active image source.
    #[must_use]
    pub const fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    /// Chosen transformations.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Background upload state.
    #[must_use]
    pub const fn upload_state(&self) -> &UploadState {
        self.uploads.state()
    }

    /// Current committed result.
    #[must_use]
    pub const fn result(&self) -> Option<&TransformResult> {
        self.render.current()
    }

    /// Derived stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        if self.source.is_none() {
            return Stage::Empty;
        }
        match self.render.current().map(TransformResult::render_state) {
            Some(RenderState::Pending) => Stage::Processing,
            Some(RenderState::Ready | RenderState::Failed) => Stage::Resulted,
            None if self.selection.is_empty() => Stage::Ready,
            None => Stage::Configuring,
        }
    }

    /// Upload banner for a local source; `None` for demo or no source.
    #[must_use]
    pub fn upload_notice(&self) -> Option<UploadNotice> {
        if !matches!(self.source, Some(ImageSource::LocalFile(_))) {
            return None;
        }
        match self.uploads.state() {
            UploadState::Idle => None,
            UploadState::RequestingCredentials => Some(UploadNotice::Uploading { progress: None }),
            UploadState::Uploading { progress } => Some(UploadNotice::Uploading {
                progress: *progress,
            }),
            UploadState::Succeeded(_) => Some(UploadNotice::Uploaded),
            UploadState::Failed(err) => Some(UploadNotice::Failed(err.clone())),
        }
    }

    // ───────────────────────── Source ─────────────────────────

    /// Make `file` the active source and start uploading it.
    ///
    /// Selection and result are cleared. The returned job must be run by
    /// the caller in the background; the session does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`FileRejected`] if the file fails the configured
    /// acceptance rules. The session is left unchanged in that case.
    pub fn pick_local_file(&mut self, file: LocalFile) -> Result<UploadJob, FileRejected> {
        self.config.accept_file(file.name(), file.size())?;
        tracing::info!(file = file.name(), size = file.size(), "local file picked");
        self.clear_derived();
        self.source = Some(ImageSource::LocalFile(file.clone()));
        Ok(self.uploads.restart(file))
    }

    /// Make a randomly chosen demo image the active source.
    pub fn pick_demo(&mut self) -> &DemoImage {
        self.pick_demo_with(&mut rand::thread_rng())
    }

    /// [`pick_demo`](Self::pick_demo) with a caller-supplied RNG.
    pub fn pick_demo_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &DemoImage {
        let index = rng.gen_range(0..self.config.demo_images.len());
        let demo = self.config.demo_images[index].clone();
        tracing::info!(demo = %demo.name, url = %demo.url, "demo image picked");
        self.clear_derived();
        self.uploads.reset();
        self.source = Some(ImageSource::Demo(demo));
        &self.config.demo_images[index]
    }

    // ───────────────────────── Selection ─────────────────────────

    /// Add or remove `id` from the selection.
    ///
    /// Any existing result is invalidated. Without a source this is a
    /// no-op. Returns whether `id` is selected afterwards.
    pub fn toggle_transformation(&mut self, id: &str) -> bool {
        if self.source.is_none() {
            tracing::debug!(id, "toggle ignored: no image selected");
            return false;
        }
        self.render.clear();
        self.selection.toggle(id)
    }

    // ───────────────────────── Commit ─────────────────────────

    /// Build the transformation request for the current selection.
    ///
    /// The base image is, in priority order: the demo source itself; the
    /// uploaded reference if the upload has succeeded; otherwise the
    /// configured fallback demo, and the result is flagged as a fallback.
    /// A pending upload is not waited for.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError`] without touching the session if there is
    /// no source or nothing is selected.
    pub fn commit(&mut self) -> Result<&TransformResult, CommitError> {
        let source = self.source.as_ref().ok_or(CommitError::NoSource)?;
        if self.selection.is_empty() {
            tracing::debug!("commit ignored: no transformations selected");
            return Err(CommitError::EmptySelection);
        }

        let (base, provenance) = match (source, self.uploads.state()) {
            (ImageSource::Demo(demo), _) => (demo.url.as_str(), Provenance::Demo),
            (ImageSource::LocalFile(_), UploadState::Succeeded(url)) => {
                (url.as_str(), Provenance::Uploaded)
            }
            (ImageSource::LocalFile(_), upload) => {
                let fallback = self
                    .config
                    .fallback_image()
                    .ok_or(CommitError::NoSource)?;
                let reason = if upload.error().is_some() {
                    FallbackReason::UploadFailed
                } else {
                    FallbackReason::UploadPending
                };
                tracing::warn!(
                    ?reason,
                    fallback = %fallback.url,
                    "upload unavailable, rendering on fallback demo image"
                );
                (fallback.url.as_str(), Provenance::Fallback(reason))
            }
        };

        let fragments = self.catalog.resolve(self.selection.iter());
        let url = chain::build(base, &fragments);
        tracing::info!(%url, ?provenance, steps = fragments.len(), "transformation committed");
        Ok(self.render.arm(url, provenance))
    }

    // ───────────────────────── Events ─────────────────────────

    /// Feed an event from a running [`UploadJob`].
    ///
    /// Returns `false` if it was stale or out of order.
    pub fn apply_upload_event(&mut self, event: UploadEvent) -> bool {
        self.uploads.apply(event)
    }

    /// The viewer loaded the result identified by `ticket`.
    pub fn on_render_ready(&mut self, ticket: &RenderTicket) -> bool {
        self.render.on_ready(ticket)
    }

    /// The viewer failed to load the result identified by `ticket`.
    pub fn on_render_failed(&mut self, ticket: &RenderTicket) -> bool {
        self.render.on_failed(ticket)
    }

    // ───────────────────────── Reset ─────────────────────────

    /// Return to `Empty`, discarding the source and any in-flight upload.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.clear_derived();
        self.source = None;
        self.uploads.reset();
    }

    fn clear_derived(&mut self) {
        self.selection.clear();
        self.render.clear();
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            config: StudioConfig::default(),
            catalog: Catalog::standard(),
            source: None,
            selection: SelectionSet::new(),
            uploads: UploadCoordinator::new(),
            render: RenderObserver::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn file(name: &str) -> LocalFile {
        LocalFile::new(name, vec![0_u8; 16], format!("blob:{name}"))
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = StudioConfig {
            demo_images: Vec::new(),
            ..StudioConfig::default()
        };
        assert_eq!(Workflow::new(config).unwrap_err(), ConfigError::EmptyGallery);
    }

    #[test]
    fn starts_empty() {
        let workflow = Workflow::default();
        assert_eq!(workflow.stage(), Stage::Empty);
        assert!(workflow.result().is_none());
        assert_eq!(workflow.upload_state(), &UploadState::Idle);
    }

    #[test]
    fn stage_progression() {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(1));
        assert_eq!(workflow.stage(), Stage::Ready);

        workflow.toggle_transformation("bg-removal");
        assert_eq!(workflow.stage(), Stage::Configuring);

        let ticket = workflow.commit().unwrap().ticket().clone();
        assert_eq!(workflow.stage(), Stage::Processing);

        assert!(workflow.on_render_ready(&ticket));
        assert_eq!(workflow.stage(), Stage::Resulted);

        workflow.reset();
        assert_eq!(workflow.stage(), Stage::Empty);
    }

    #[test]
    fn toggle_without_source_is_noop() {
        let mut workflow = Workflow::default();
        assert!(!workflow.toggle_transformation("bg-removal"));
        assert!(workflow.selection().is_empty());
    }

    #[test]
    fn commit_without_source_is_rejected() {
        let mut workflow = Workflow::default();
        assert_eq!(workflow.commit().unwrap_err(), CommitError::NoSource);
    }

    #[test]
    fn rejected_file_leaves_session_unchanged() {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(3));
        workflow.toggle_transformation("upscale");

        let err = workflow.pick_local_file(file("notes.txt")).unwrap_err();
        assert_eq!(err, FileRejected::UnsupportedType("notes.txt".into()));
        assert!(workflow.source().unwrap().is_demo());
        assert!(workflow.selection().contains("upscale"));
    }

    #[test]
    fn picking_a_source_clears_selection_and_result() {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(5));
        workflow.toggle_transformation("upscale");
        workflow.commit().unwrap();

        let _job = workflow.pick_local_file(file("cat.png")).unwrap();
        assert!(workflow.selection().is_empty());
        assert!(workflow.result().is_none());
        assert_eq!(workflow.upload_state(), &UploadState::RequestingCredentials);
        assert_eq!(workflow.stage(), Stage::Ready);
    }

    #[test]
    fn demo_pick_orphans_local_upload() {
        let mut workflow = Workflow::default();
        let job = workflow.pick_local_file(file("cat.png")).unwrap();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(9));

        assert!(!workflow.apply_upload_event(UploadEvent::Finished {
            ticket: job.ticket(),
            outcome: Ok("https://cdn/cat.png".into()),
        }));
        assert_eq!(workflow.upload_state(), &UploadState::Idle);
        assert!(workflow.upload_notice().is_none());
    }

    #[test]
    fn fallback_records_why_the_upload_was_unavailable() {
        let mut workflow = Workflow::default();
        let ticket = workflow.pick_local_file(file("cat.png")).unwrap().ticket();
        workflow.toggle_transformation("upscale");
        assert_eq!(
            workflow.commit().unwrap().provenance(),
            Provenance::Fallback(FallbackReason::UploadPending)
        );

        workflow.apply_upload_event(UploadEvent::Finished {
            ticket,
            outcome: Err(UploadError::Transport("connection reset".into())),
        });
        assert_eq!(
            workflow.commit().unwrap().provenance(),
            Provenance::Fallback(FallbackReason::UploadFailed)
        );
    }

    #[test]
    fn pick_demo_uses_gallery_entry() {
        let mut workflow = Workflow::default();
        let picked = workflow.pick_demo_with(&mut StdRng::seed_from_u64(11)).clone();
        assert!(workflow.config().demo_images.contains(&picked));
        assert_eq!(workflow.source().unwrap().preview_url(), picked.url);
    }

    #[test]
    fn upload_notice_follows_upload_state() {
        let mut workflow = Workflow::default();
        let ticket = workflow.pick_local_file(file("cat.png")).unwrap().ticket();
        assert_eq!(
            workflow.upload_notice(),
            Some(UploadNotice::Uploading { progress: None })
        );

        workflow.apply_upload_event(UploadEvent::CredentialsIssued(ticket));
        workflow.apply_upload_event(UploadEvent::Progress {
            ticket,
            fraction: 0.5,
        });
        assert_eq!(
            workflow.upload_notice(),
            Some(UploadNotice::Uploading {
                progress: Some(0.5)
            })
        );

        workflow.apply_upload_event(UploadEvent::Finished {
            ticket,
            outcome: Err(UploadError::Transport("connection reset".into())),
        });
        assert_eq!(
            workflow.upload_notice(),
            Some(UploadNotice::Failed(UploadError::Transport(
                "connection reset".into()
            )))
        );
    }

    #[test]
    fn failed_upload_commits_as_fallback() {
        let mut workflow = Workflow::default();
        let ticket = workflow.pick_local_file(file("cat.png")).unwrap().ticket();
        workflow.apply_upload_event(UploadEvent::Finished {
            ticket,
            outcome: Err(UploadError::Auth("HTTP 401".into())),
        });
        workflow.toggle_transformation("enhance-basic");

        let fallback = workflow.config().fallback_image().unwrap().url.clone();
        let result = workflow.commit().unwrap();
        assert!(result.is_fallback());
        assert_eq!(result.requested_url(), format!("{fallback}?tr=e-retouch"));
    }

    #[test]
    fn unknown_ids_still_produce_a_result() {
        let mut workflow = Workflow::default();
        workflow.pick_demo_with(&mut StdRng::seed_from_u64(2));
        workflow.toggle_transformation("retired-tool");
        let base = workflow.source().unwrap().preview_url().to_owned();
        let result = workflow.commit().unwrap();
        assert_eq!(result.requested_url(), base);
        assert_eq!(result.provenance(), Provenance::Demo);
    }
}
