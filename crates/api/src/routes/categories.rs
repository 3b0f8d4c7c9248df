//! Route definitions for the public catalog.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// Static segments take priority over `{slug}`; category names that would
/// slug to one of them are rejected by `slug_for_name`.
///
/// ```text
/// GET    /homepage         -> homepage
/// PATCH  /reorder          -> reorder (auth)
/// GET    /{slug}           -> by_slug
/// GET    /{slug}/view      -> render_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/homepage", get(categories::homepage))
        .route("/reorder", patch(categories::reorder))
        .route("/{slug}", get(categories::by_slug))
        .route("/{slug}/view", get(categories::render_view))
}
