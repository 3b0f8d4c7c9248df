//! Route definitions for provider webhooks.
//!
//! These routes carry no session token; each delivery is authenticated by
//! its signature instead.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /user    -> user_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/user", post(webhooks::user_event))
}
