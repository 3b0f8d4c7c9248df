//! Authentication extractors for Axum handlers.
//!
//! [`AuthIdentity`] only verifies the session token. [`CurrentOwner`] goes
//! one step further and resolves the verified identity to its owner row,
//! which is what every owner-scoped handler needs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use catalog_core::error::CoreError;
use catalog_db::models::owner::Owner;
use catalog_db::repositories::OwnerRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Verified external identity extracted from a Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    /// The identity provider's user id (from `claims.sub`).
    pub external_id: String,
}

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Token has no subject".into(),
            )));
        }

        Ok(AuthIdentity {
            external_id: claims.sub,
        })
    }
}

/// Owner row of the authenticated caller.
///
/// A valid token whose identity was never provisioned yields 404
/// "Owner not found".
#[derive(Debug, Clone)]
pub struct CurrentOwner(pub Owner);

impl FromRequestParts<AppState> for CurrentOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = AuthIdentity::from_request_parts(parts, state).await?;

        let owner = OwnerRepo::find_by_external_id(&state.pool, &identity.external_id).await?;

        match owner {
            Some(owner) => Ok(CurrentOwner(owner)),
            None => Err(AppError::Core(CoreError::NotFoundByKey {
                entity: "Owner",
                key: identity.external_id,
            })),
        }
    }
}
