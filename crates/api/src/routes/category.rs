//! Route definitions for owner-scoped category management.
//!
//! All endpoints require authentication.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/category`.
///
/// ```text
/// POST   /                 -> create
/// GET    /                 -> list_tree
/// PUT    /                 -> update
/// DELETE /                 -> delete
/// GET    /{id}             -> get_by_id
/// PUT    /{id}/layout      -> update_layout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_tree)
                .post(category::create)
                .put(category::update)
                .delete(category::delete),
        )
        .route("/{id}", get(category::get_by_id))
        .route("/{id}/layout", put(category::update_layout))
}
