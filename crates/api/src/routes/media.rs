//! Route definitions for the media host proxy.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Extra bytes allowed on top of the raw size cap for multipart framing.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Routes mounted at `/media`. All require authentication.
///
/// The body limit leaves room for base64 inflation (4/3) of a maximum-size
/// image; the exact cap is enforced on the decoded bytes by the handler.
///
/// ```text
/// POST   /    -> upload
/// DELETE /    -> delete
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    let body_limit = max_upload_bytes
        .saturating_mul(4)
        .div_ceil(3)
        .saturating_add(BODY_OVERHEAD);

    Router::new()
        .route("/", post(media::upload).delete(media::delete))
        .layer(DefaultBodyLimit::max(body_limit))
}
