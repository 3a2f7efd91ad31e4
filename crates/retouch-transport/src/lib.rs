//! retouch-transport: HTTP side of the retouch studio.
//!
//! Talks to two external endpoints: the credential endpoint that signs
//! one-time upload tokens, and the transformation service's upload API.
//! [`ImageKitClient`] implements
//! [`UploadBackend`](retouch_workflow::UploadBackend) so the workflow
//! engine can drive it without knowing about HTTP.
//!
//! Built on `reqwest`, so the same client runs in the browser
//! (`wasm32-unknown-unknown`, backed by `fetch`) and natively (used by
//! `retouch-probe`).

pub mod client;
pub mod error;
pub mod probe;

pub use client::ImageKitClient;
pub use error::TransportError;
pub use probe::{ProbeReport, probe};
