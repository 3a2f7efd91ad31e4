//! Credential and upload client.

use reqwest::multipart::{Form, Part};
use retouch_workflow::{Credentials, LocalFile, StudioConfig, UploadBackend, UploadResponse};
use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// Client for the credential endpoint and the upload API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ImageKitClient {
    http: reqwest::Client,
    credential_endpoint: String,
    upload_endpoint: String,
}

impl ImageKitClient {
    /// Create a client for the given endpoints.
    ///
    /// Both must be absolute URLs; in the browser, resolve relative
    /// endpoints against the page origin first.
    #[must_use]
    pub fn new(credential_endpoint: impl Into<String>, upload_endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            credential_endpoint: credential_endpoint.into(),
            upload_endpoint: upload_endpoint.into(),
        }
    }

    /// Create a client for the endpoints in `config`.
    #[must_use]
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(&config.credential_endpoint, &config.upload_endpoint)
    }

    /// Credential endpoint URL.
    #[must_use]
    pub fn credential_endpoint(&self) -> &str {
        &self.credential_endpoint
    }

    /// Upload endpoint URL.
    #[must_use]
    pub fn upload_endpoint(&self) -> &str {
        &self.upload_endpoint
    }

    /// Fetch one-time upload credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request fails, the endpoint
    /// answers with a non-success status, or the body is not a
    /// credential object.
    pub async fn request_credentials(&self) -> Result<Credentials, TransportError> {
        tracing::debug!(endpoint = %self.credential_endpoint, "requesting upload credentials");
        let response = self.http.get(&self.credential_endpoint).send().await?;
        read_json(response).await
    }

    /// Upload `file` using `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request fails, the API answers
    /// with a non-success status, or the body cannot be decoded. A
    /// decodable body without a `url` is returned as-is; deciding that it
    /// is a failure is up to the caller.
    pub async fn send_upload(
        &self,
        file: &LocalFile,
        credentials: &Credentials,
    ) -> Result<UploadResponse, TransportError> {
        tracing::debug!(
            endpoint = %self.upload_endpoint,
            file = file.name(),
            size = file.size(),
            "uploading file"
        );
        let response = self
            .http
            .post(&self.upload_endpoint)
            .multipart(upload_form(file, credentials))
            .send()
            .await?;
        read_json(response).await
    }
}

impl UploadBackend for ImageKitClient {
    type Error = TransportError;

    async fn fetch_credentials(&self) -> Result<Credentials, TransportError> {
        self.request_credentials().await
    }

    // `fetch` exposes no upload progress, so none is reported and the
    // UI stays indeterminate until completion.
    async fn upload(
        &self,
        file: &LocalFile,
        credentials: &Credentials,
        _on_progress: &mut dyn FnMut(f64),
    ) -> Result<UploadResponse, TransportError> {
        self.send_upload(file, credentials).await
    }
}

/// Multipart body expected by the upload API.
fn upload_form(file: &LocalFile, credentials: &Credentials) -> Form {
    let part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_owned());
    Form::new()
        .part("file", part)
        .text("fileName", file.name().to_owned())
        .text("token", credentials.token.clone())
        .text("expire", credentials.expire.to_string())
        .text("signature", credentials.signature.clone())
        .text("publicKey", credentials.public_key.clone())
        .text("useUniqueFileName", "true")
}

/// Read a JSON body, turning non-success statuses into errors.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TransportError::status(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}
