//! Identity-provisioning webhook (`/webhooks/user`).
//!
//! The body must be read raw: the signature covers the exact bytes that
//! were delivered, so it is verified before any JSON parsing happens.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_core::webhook::{HEADER_ID, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use catalog_db::models::owner::CreateOwner;
use catalog_db::repositories::OwnerRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Event type that provisions an owner.
pub const USER_CREATED: &str = "user.created";

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Subset of the provider's user object that we keep.
#[derive(Debug, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneNumber {
    pub phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct Provisioned {
    pub owner_id: DbId,
    pub created: bool,
}

impl UserData {
    /// Owner profile for this user. Fails when the user has no id.
    pub fn into_owner(self) -> Result<CreateOwner, CoreError> {
        let external_id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Validation("user id is required".into()))?;

        let full_name = [self.first_name, self.last_name]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(CreateOwner {
            external_id,
            username: self.username,
            email: self.email_addresses.into_iter().next().map(|e| e.email_address),
            full_name,
            avatar_url: self.profile_image_url.or(self.image_url),
            phone_numbers: self
                .phone_numbers
                .into_iter()
                .map(|p| p.phone_number)
                .collect(),
        })
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> AppResult<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing webhook signature headers".into(),
            ))
        })
}

/// POST /api/v1/webhooks/user
///
/// `user.created` provisions an owner unless one already exists for the
/// identity; redelivery is a no-op success. Other event types are
/// acknowledged and ignored.
pub async fn user_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let msg_id = header(&headers, HEADER_ID)?;
    let timestamp = header(&headers, HEADER_TIMESTAMP)?;
    let signatures = header(&headers, HEADER_SIGNATURE)?;

    state.config.webhook_secret.verify(
        msg_id,
        timestamp,
        signatures,
        &body,
        chrono::Utc::now().timestamp(),
    )?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if event.event_type != USER_CREATED {
        tracing::debug!(msg_id, event_type = %event.event_type, "Ignoring webhook event");
        return Ok(Json(ApiResponse::with_message(
            "Event ignored",
            None::<Provisioned>,
        )));
    }

    let user: UserData = serde_json::from_value(event.data)
        .map_err(|e| AppError::BadRequest(format!("Invalid user payload: {e}")))?;
    let profile = user.into_owner()?;

    let (owner, created) = OwnerRepo::create_if_absent(&state.pool, &profile).await?;

    tracing::info!(
        msg_id,
        owner_id = owner.id,
        external_id = %owner.external_id,
        created,
        "Identity provisioned",
    );

    let message = if created {
        "User created successfully"
    } else {
        "User already exists"
    };
    Ok(Json(ApiResponse::with_message(
        message,
        Some(Provisioned {
            owner_id: owner.id,
            created,
        }),
    )))
}
