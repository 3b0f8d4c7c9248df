//! Handler for the owner dashboard counters.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use catalog_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::CurrentOwner;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = DashboardRepo::stats(&state.pool, owner.id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
