//! Handlers for image upload and deletion on the media host (`/media`).
//!
//! Uploads arrive either as `multipart/form-data` (a `file` part plus
//! optional `folder` / `public_id` text parts) or as JSON carrying a base64
//! `image`. Both paths sniff the bytes and enforce the configured size cap
//! before anything is sent to the host.

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::media::{check_image_bytes, decode_base64_image};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::media::{MediaError, MediaStore, UploadRequest};
use crate::middleware::auth::AuthIdentity;
use crate::response::ApiResponse;
use crate::state::AppState;

/// JSON upload body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonUpload {
    /// Base64 image, optionally with a `data:...;base64,` prefix.
    pub image: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteMedia {
    pub public_id: String,
}

fn media_store(state: &AppState) -> AppResult<Arc<dyn MediaStore>> {
    state
        .media
        .clone()
        .ok_or(AppError::Media(MediaError::NotConfigured))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/media
pub async fn upload(
    identity: AuthIdentity,
    State(state): State<AppState>,
    request: Request,
) -> AppResult<impl IntoResponse> {
    let store = media_store(&state)?;
    let media = &state.config.media;

    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut upload = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        read_multipart(multipart).await?
    } else if content_type.starts_with("application/json") {
        let AppJson(body) = AppJson::<JsonUpload>::from_request(request, &state).await?;
        UploadRequest {
            bytes: decode_base64_image(&body.image)?,
            file_name: String::new(),
            folder: body.folder.unwrap_or_default(),
            public_id: non_blank(body.public_id),
            overwrite: body.overwrite,
        }
    } else {
        return Err(AppError::BadRequest("Unsupported content type".into()));
    };

    let extension = check_image_bytes(&upload.bytes, media.max_upload_bytes)?;
    if upload.file_name.is_empty() {
        upload.file_name = format!("upload.{extension}");
    }
    if upload.folder.trim().is_empty() {
        upload.folder = media.default_folder.clone();
    }

    let size = upload.bytes.len();
    let stored = store.upload(upload).await?;

    tracing::info!(
        external_id = %identity.external_id,
        public_id = %stored.public_id,
        size,
        "Image uploaded",
    );

    Ok(Json(ApiResponse::ok(stored)))
}

async fn read_multipart(mut multipart: Multipart) -> AppResult<UploadRequest> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = None;
    let mut public_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let is_image = field
                    .content_type()
                    .is_some_and(|ct| ct.starts_with("image/"));
                if !is_image {
                    return Err(AppError::Core(CoreError::Validation(
                        "only image files are allowed".into(),
                    )));
                }
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, data.to_vec()));
            }
            "folder" | "public_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if name == "folder" {
                    folder = Some(text);
                } else {
                    public_id = Some(text);
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    Ok(UploadRequest {
        bytes,
        file_name,
        folder: non_blank(folder).unwrap_or_default(),
        public_id: non_blank(public_id),
        overwrite: true,
    })
}

/// DELETE /api/v1/media
///
/// Succeeds only when the host confirms the deletion. Not retried.
pub async fn delete(
    identity: AuthIdentity,
    State(state): State<AppState>,
    AppJson(input): AppJson<DeleteMedia>,
) -> AppResult<impl IntoResponse> {
    let store = media_store(&state)?;
    let public_id = input.public_id.trim();
    if public_id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "public_id is required".into(),
        )));
    }

    store.delete(public_id).await?;

    tracing::info!(
        external_id = %identity.external_id,
        public_id,
        "Image deleted",
    );

    Ok(Json(ApiResponse::message("Image deleted successfully")))
}
