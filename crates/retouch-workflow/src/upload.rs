//! Background upload lifecycle.
//!
//! [`UploadCoordinator`] is a small state machine:
//!
//! ```text
//! Idle -> RequestingCredentials -> Uploading -> Succeeded | Failed
//! ```
//!
//! It performs no I/O itself. [`UploadCoordinator::start`] hands out an
//! [`UploadJob`] that the caller runs against an [`UploadBackend`] on its
//! own executor; the job reports back through [`UploadEvent`]s which are
//! fed to [`UploadCoordinator::apply`].
//!
//! Every job carries the coordinator generation it was started under.
//! [`reset`](UploadCoordinator::reset) bumps the generation, so events
//! from a superseded job are recognised and dropped instead of
//! overwriting the current state. The network transfer itself is never
//! cancelled.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{UploadBusy, UploadError};
use crate::types::LocalFile;

/// Short-lived, single-use upload credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// One-time token.
    pub token: String,
    /// Expiry as a Unix timestamp in seconds.
    pub expire: u64,
    /// Request signature.
    pub signature: String,
    /// Public account key.
    pub public_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("expire", &self.expire)
            .field("signature", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Response body of a completed upload.
///
/// A missing `url` is treated as a failed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Durable reference to the uploaded file.
    #[serde(default)]
    pub url: Option<String>,
    /// Service-side file identifier, when reported.
    #[serde(default)]
    pub file_id: Option<String>,
}

/// The network side of an upload: credential fetch and transfer.
///
/// Implemented by the HTTP client in `retouch-transport` and by test
/// doubles. Errors only need to be displayable; the coordinator maps
/// them onto [`UploadError`].
#[allow(async_fn_in_trait)] // WASM is single-threaded; futures need not be Send
pub trait UploadBackend {
    /// Transport error type.
    type Error: fmt::Display;

    /// Request fresh upload credentials.
    async fn fetch_credentials(&self) -> Result<Credentials, Self::Error>;

    /// Upload `file` with `credentials`.
    ///
    /// `on_progress` may be called zero or more times with the fraction
    /// transferred so far. It is advisory only.
    async fn upload(
        &self,
        file: &LocalFile,
        credentials: &Credentials,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<UploadResponse, Self::Error>;
}

/// Generation tag identifying one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTicket(u64);

impl UploadTicket {
    /// The generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Outcome notifications produced by [`UploadJob::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// Credentials were obtained; the transfer is starting.
    CredentialsIssued(UploadTicket),
    /// Fraction of the file transferred, in `[0, 1]`.
    Progress {
        /// Job the notification belongs to.
        ticket: UploadTicket,
        /// Transferred fraction.
        fraction: f64,
    },
    /// The attempt finished.
    Finished {
        /// Job the notification belongs to.
        ticket: UploadTicket,
        /// Remote reference, or why there is none.
        outcome: Result<String, UploadError>,
    },
}

impl UploadEvent {
    /// The ticket this event belongs to.
    #[must_use]
    pub const fn ticket(&self) -> UploadTicket {
        match self {
            Self::CredentialsIssued(ticket)
            | Self::Progress { ticket, .. }
            | Self::Finished { ticket, .. } => *ticket,
        }
    }
}

/// Observable upload state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadState {
    /// No upload for the current source.
    #[default]
    Idle,
    /// Waiting for the credential endpoint.
    RequestingCredentials,
    /// Transfer in progress. `None` progress means indeterminate.
    Uploading {
        /// Last reported fraction, never decreasing.
        progress: Option<f64>,
    },
    /// The file is available remotely at this reference.
    Succeeded(String),
    /// The attempt failed.
    Failed(UploadError),
}

impl UploadState {
    /// Whether an attempt is underway.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::RequestingCredentials | Self::Uploading { .. })
    }

    /// The remote reference, once succeeded.
    #[must_use]
    pub fn remote_reference(&self) -> Option<&str> {
        match self {
            Self::Succeeded(url) => Some(url),
            _ => None,
        }
    }

    /// The failure, once failed.
    #[must_use]
    pub const fn error(&self) -> Option<&UploadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// A started upload waiting to be driven by the caller's executor.
#[derive(Debug, Clone)]
#[must_use = "an upload job does nothing until .run() is awaited"]
pub struct UploadJob {
    ticket: UploadTicket,
    file: LocalFile,
}

impl UploadJob {
    /// The ticket events from this job will carry.
    pub const fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    /// Drive the upload to completion, reporting through `emit`.
    ///
    /// Always ends with exactly one [`UploadEvent::Finished`]. A credential
    /// failure finishes with [`UploadError::Auth`] without attempting the
    /// transfer.
    #[allow(clippy::future_not_send)] // LocalFile shares bytes via Rc
    pub async fn run<B>(self, backend: &B, mut emit: impl FnMut(UploadEvent))
    where
        B: UploadBackend,
    {
        let ticket = self.ticket;

        let credentials = match backend.fetch_credentials().await {
            Ok(credentials) => credentials,
            Err(e) => {
                emit(UploadEvent::Finished {
                    ticket,
                    outcome: Err(UploadError::Auth(e.to_string())),
                });
                return;
            }
        };
        emit(UploadEvent::CredentialsIssued(ticket));

        let response = {
            let mut on_progress = |fraction: f64| emit(UploadEvent::Progress { ticket, fraction });
            backend
                .upload(&self.file, &credentials, &mut on_progress)
                .await
        };

        let outcome = match response {
            Ok(UploadResponse { url: Some(url), .. }) if !url.is_empty() => Ok(url),
            Ok(_) => Err(UploadError::MissingUrl),
            Err(e) => Err(UploadError::Transport(e.to_string())),
        };
        emit(UploadEvent::Finished { ticket, outcome });
    }
}

/// Owner of the upload state for the active source.
#[derive(Debug, Default)]
pub struct UploadCoordinator {
    state: UploadState,
    generation: u64,
}

impl UploadCoordinator {
    /// A coordinator in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &UploadState {
        &self.state
    }

    /// Current generation; events tagged with any other are stale.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin uploading `file`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadBusy`] unless the coordinator is `Idle`.
    pub fn start(&mut self, file: LocalFile) -> Result<UploadJob, UploadBusy> {
        if self.state != UploadState::Idle {
            return Err(UploadBusy);
        }
        self.generation += 1;
        self.state = UploadState::RequestingCredentials;
        tracing::debug!(generation = self.generation, file = file.name(), "upload started");
        Ok(UploadJob {
            ticket: UploadTicket(self.generation),
            file,
        })
    }

    /// Reset and immediately start uploading `file`.
    pub fn restart(&mut self, file: LocalFile) -> UploadJob {
        self.reset();
        self.generation += 1;
        self.state = UploadState::RequestingCredentials;
        tracing::debug!(generation = self.generation, file = file.name(), "upload started");
        UploadJob {
            ticket: UploadTicket(self.generation),
            file,
        }
    }

    /// Return to `Idle`, orphaning any in-flight job.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = UploadState::Idle;
    }

    /// Apply an event from a running job.
    ///
    /// Returns `false` if the event was dropped: it belongs to a
    /// superseded generation, or it would move the state backwards.
    pub fn apply(&mut self, event: UploadEvent) -> bool {
        let ticket = event.ticket();
        if ticket.0 != self.generation {
            tracing::debug!(
                event_generation = ticket.0,
                generation = self.generation,
                "dropping stale upload event"
            );
            return false;
        }

        match event {
            UploadEvent::CredentialsIssued(_) => {
                if self.state != UploadState::RequestingCredentials {
                    return false;
                }
                self.state = UploadState::Uploading { progress: None };
                true
            }
            UploadEvent::Progress { fraction, .. } => {
                let UploadState::Uploading { progress } = &mut self.state else {
                    return false;
                };
                if fraction.is_nan() {
                    return false;
                }
                let fraction = fraction.clamp(0.0, 1.0);
                if progress.is_some_and(|previous| previous >= fraction) {
                    return false;
                }
                *progress = Some(fraction);
                true
            }
            UploadEvent::Finished { outcome, .. } => {
                if !self.state.is_in_flight() {
                    return false;
                }
                self.state = match outcome {
                    Ok(url) => {
                        tracing::info!(generation = ticket.0, %url, "upload succeeded");
                        UploadState::Succeeded(url)
                    }
                    Err(err) => {
                        tracing::warn!(
                            generation = ticket.0,
                            reason = err.reason(),
                            error = %err,
                            "upload failed"
                        );
                        UploadState::Failed(err)
                    }
                };
                true
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file() -> LocalFile {
        LocalFile::new("cat.png", vec![1_u8, 2, 3], "blob:cat")
    }

    fn finished(ticket: UploadTicket, outcome: Result<String, UploadError>) -> UploadEvent {
        UploadEvent::Finished { ticket, outcome }
    }

    #[test]
    fn start_only_from_idle() {
        let mut coordinator = UploadCoordinator::new();
        let job = coordinator.start(file()).unwrap();
        assert_eq!(coordinator.state(), &UploadState::RequestingCredentials);
        assert_eq!(job.ticket().generation(), coordinator.generation());
        assert_eq!(coordinator.start(file()).unwrap_err(), UploadBusy);
    }

    #[test]
    fn happy_path_transitions() {
        let mut coordinator = UploadCoordinator::new();
        let ticket = coordinator.start(file()).unwrap().ticket();

        assert!(coordinator.apply(UploadEvent::CredentialsIssued(ticket)));
        assert_eq!(coordinator.state(), &UploadState::Uploading { progress: None });

        assert!(coordinator.apply(UploadEvent::Progress {
            ticket,
            fraction: 0.4
        }));
        assert_eq!(
            coordinator.state(),
            &UploadState::Uploading {
                progress: Some(0.4)
            }
        );

        assert!(coordinator.apply(finished(ticket, Ok("https://cdn/x.png".into()))));
        assert_eq!(coordinator.state().remote_reference(), Some("https://cdn/x.png"));
    }

    #[test]
    fn progress_never_decreases_and_is_clamped() {
        let mut coordinator = UploadCoordinator::new();
        let ticket = coordinator.start(file()).unwrap().ticket();
        coordinator.apply(UploadEvent::CredentialsIssued(ticket));

        assert!(coordinator.apply(UploadEvent::Progress {
            ticket,
            fraction: 0.7
        }));
        assert!(!coordinator.apply(UploadEvent::Progress {
            ticket,
            fraction: 0.3
        }));
        assert!(!coordinator.apply(UploadEvent::Progress {
            ticket,
            fraction: f64::NAN
        }));
        assert!(coordinator.apply(UploadEvent::Progress {
            ticket,
            fraction: 3.0
        }));
        assert_eq!(
            coordinator.state(),
            &UploadState::Uploading {
                progress: Some(1.0)
            }
        );
    }

    #[test]
    fn auth_failure_goes_straight_to_failed() {
        let mut coordinator = UploadCoordinator::new();
        let ticket = coordinator.start(file()).unwrap().ticket();
        assert!(coordinator.apply(finished(ticket, Err(UploadError::Auth("HTTP 500".into())))));
        assert_eq!(coordinator.state().error().map(UploadError::reason), Some("auth"));
    }

    #[test]
    fn terminal_states_are_sticky() {
        let mut coordinator = UploadCoordinator::new();
        let ticket = coordinator.start(file()).unwrap().ticket();
        coordinator.apply(finished(ticket, Err(UploadError::MissingUrl)));
        assert!(!coordinator.apply(finished(ticket, Ok("https://cdn/late.png".into()))));
        assert!(!coordinator.apply(UploadEvent::CredentialsIssued(ticket)));
        assert_eq!(coordinator.state(), &UploadState::Failed(UploadError::MissingUrl));
    }

    #[test]
    fn stale_generation_is_dropped_after_reset() {
        let mut coordinator = UploadCoordinator::new();
        let old = coordinator.start(file()).unwrap().ticket();
        coordinator.reset();
        assert_eq!(coordinator.state(), &UploadState::Idle);

        assert!(!coordinator.apply(finished(old, Ok("https://cdn/old.png".into()))));
        assert_eq!(coordinator.state(), &UploadState::Idle);

        let new = coordinator.start(file()).unwrap().ticket();
        assert_ne!(old, new);
        assert!(!coordinator.apply(UploadEvent::CredentialsIssued(old)));
        assert!(coordinator.apply(UploadEvent::CredentialsIssued(new)));
    }

    #[test]
    fn restart_supersedes_running_job() {
        let mut coordinator = UploadCoordinator::new();
        let first = coordinator.start(file()).unwrap().ticket();
        let second = coordinator.restart(file()).ticket();
        assert!(second > first);
        assert_eq!(coordinator.state(), &UploadState::RequestingCredentials);
        assert!(!coordinator.apply(finished(first, Ok("https://cdn/first.png".into()))));
        assert!(coordinator.apply(finished(second, Ok("https://cdn/second.png".into()))));
        assert_eq!(coordinator.state().remote_reference(), Some("https://cdn/second.png"));
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let credentials = Credentials {
            token: "tok-123".into(),
            expire: 1_700_000_000,
            signature: "sig-456".into(),
            public_key: "public_abc".into(),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("tok-123"));
        assert!(!debug.contains("sig-456"));
        assert!(debug.contains("public_abc"));
    }

    #[test]
    fn credentials_use_camel_case_wire_names() {
        let credentials: Credentials = serde_json::from_str(
            r#"{"token":"t","expire":1700000000,"signature":"s","publicKey":"p"}"#,
        )
        .unwrap();
        assert_eq!(credentials.public_key, "p");
        assert_eq!(credentials.expire, 1_700_000_000);
    }

    #[test]
    fn response_without_url_deserializes() {
        let response: UploadResponse = serde_json::from_str(r#"{"fileId":"abc"}"#).unwrap();
        assert_eq!(response.url, None);
        assert_eq!(response.file_id.as_deref(), Some("abc"));
    }
}
