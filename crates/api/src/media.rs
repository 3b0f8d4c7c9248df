//! Client for the external media host.
//!
//! Handlers talk to the host through the [`MediaStore`] trait so tests can
//! swap in an in-memory store. [`CloudinaryStore`] is the production
//! implementation: signed `upload` and `destroy` calls over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::media::{sign_request, DEFAULT_MAX_UPLOAD_BYTES};
use serde::{Deserialize, Serialize};

/// Default API endpoint of the media host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Timeout applied to every media host request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the media host layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// No media credentials were configured.
    #[error("media storage not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("media host error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The host answered but did not delete the asset.
    #[error("media host refused deletion: {0}")]
    DeleteRejected(String),
}

/// Media host settings.
#[derive(Clone)]
pub struct MediaConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_base: String,
    pub default_folder: String,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_base", &self.api_base)
            .field("default_folder", &self.default_folder)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            api_base: DEFAULT_API_BASE.to_string(),
            default_folder: "uploads".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MediaConfig {
    /// Load media settings from environment variables.
    ///
    /// | Env Var                  | Default                      |
    /// |--------------------------|------------------------------|
    /// | `MEDIA_CLOUD_NAME`       | unset                        |
    /// | `MEDIA_API_KEY`          | unset                        |
    /// | `MEDIA_API_SECRET`       | unset                        |
    /// | `MEDIA_API_BASE`         | `https://api.cloudinary.com` |
    /// | `MEDIA_DEFAULT_FOLDER`   | `uploads`                    |
    /// | `MEDIA_MAX_UPLOAD_BYTES` | `10485760`                   |
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let max_upload_bytes: usize = std::env::var("MEDIA_MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MEDIA_MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            cloud_name: non_empty("MEDIA_CLOUD_NAME"),
            api_key: non_empty("MEDIA_API_KEY"),
            api_secret: non_empty("MEDIA_API_SECRET"),
            api_base: non_empty("MEDIA_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            default_folder: non_empty("MEDIA_DEFAULT_FOLDER").unwrap_or_else(|| "uploads".into()),
            max_upload_bytes,
        }
    }

    /// Cloud name, API key and secret, when all three are configured.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.cloud_name.as_deref()?,
            self.api_key.as_deref()?,
            self.api_secret.as_deref()?,
        ))
    }
}

/// An image to store on the media host.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub folder: String,
    pub public_id: Option<String>,
    pub overwrite: bool,
}

/// What the host reports for a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMedia {
    pub url: String,
    pub secure_url: String,
    pub public_id: String,
}

/// Storage backend for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an image and return its reference and URLs.
    async fn upload(&self, request: UploadRequest) -> Result<StoredMedia, MediaError>;

    /// Delete the image with the given reference.
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

/// [`MediaStore`] backed by the Cloudinary upload API.
pub struct CloudinaryStore {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStore {
    /// Build a store from configuration. Returns `Ok(None)` when credentials
    /// are missing.
    pub fn from_config(config: &MediaConfig) -> Result<Option<Self>, MediaError> {
        let Some((cloud_name, api_key, api_secret)) = config.credentials() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Some(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }))
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{action}", self.api_base, self.cloud_name)
    }

    fn signed_form(&self, params: &[(&str, &str)]) -> reqwest::multipart::Form {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut signed: Vec<(&str, &str)> = params.to_vec();
        signed.push(("timestamp", timestamp.as_str()));
        let signature = sign_request(&signed, &self.api_secret);

        let mut form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in signed.into_iter().filter(|(_, v)| !v.is_empty()) {
            form = form.text(name.to_string(), value.to_string());
        }
        form
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".into());
            return Err(MediaError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, request: UploadRequest) -> Result<StoredMedia, MediaError> {
        let public_id = request.public_id.as_deref().unwrap_or("");
        let overwrite = if request.public_id.is_some() {
            request.overwrite.to_string()
        } else {
            String::new()
        };
        let form = self
            .signed_form(&[
                ("folder", request.folder.as_str()),
                ("public_id", public_id),
                ("overwrite", overwrite.as_str()),
            ])
            .part(
                "file",
                reqwest::multipart::Part::bytes(request.bytes).file_name(request.file_name),
            );

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let stored: StoredMedia = Self::ensure_success(response).await?.json().await?;

        tracing::debug!(public_id = %stored.public_id, "Image stored on media host");
        Ok(stored)
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let form = self.signed_form(&[("public_id", public_id)]);
        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;
        let outcome: DestroyResponse = Self::ensure_success(response).await?.json().await?;

        if outcome.result == "ok" {
            Ok(())
        } else {
            Err(MediaError::DeleteRejected(outcome.result))
        }
    }
}
