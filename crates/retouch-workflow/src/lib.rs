//! retouch-workflow: Client-side workflow engine (sans-IO).
//!
//! Sequences one editing session against a remote image transformation
//! service:
//! pick source -> (background upload) -> toggle tools -> commit ->
//! wait for the transformed reference to load.
//!
//! This crate has **no I/O dependencies** -- network round-trips are
//! performed by an [`UploadBackend`] supplied by the caller, and image
//! load events are reported back by whatever surface renders the
//! result. All browser interaction lives in `retouch-io`, the HTTP
//! client in `retouch-transport`.

pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod render;
pub mod types;
pub mod upload;
pub mod workflow;

pub use catalog::{Catalog, IconTag, TransformationOption};
pub use chain::build as build_chain_url;
pub use config::{DemoImage, StudioConfig};
pub use error::{CommitError, ConfigError, FileRejected, RenderError, UploadBusy, UploadError};
pub use render::{RenderObserver, RenderState, RenderTicket, TransformResult};
pub use types::{FallbackReason, ImageSource, LocalFile, Provenance, SelectionSet};
pub use upload::{
    Credentials, UploadBackend, UploadCoordinator, UploadEvent, UploadJob, UploadResponse,
    UploadState, UploadTicket,
};
pub use workflow::{Stage, UploadNotice, Workflow};
