use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`. All require authentication.
///
/// ```text
/// POST   /    -> create
/// GET    /    -> list
/// DELETE /    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(product::list)
            .post(product::create)
            .delete(product::delete),
    )
}
