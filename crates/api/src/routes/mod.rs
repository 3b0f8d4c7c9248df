pub mod categories;
pub mod category;
pub mod dashboard;
pub mod health;
pub mod media;
pub mod products;
pub mod webhooks;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories/homepage                 homepage sections (public)
/// /categories/reorder                  bulk layout-order update (PATCH)
/// /categories/{slug}                   public category page
/// /categories/{slug}/view              render plan (public)
///
/// /category                            create, tree, update, delete
/// /category/{id}                       owner-scoped fetch
/// /category/{id}/layout                layout update (PUT)
///
/// /products                            create, list, delete
///
/// /media                               upload, delete
///
/// /dashboard/stats                     owner counters
///
/// /webhooks/user                       identity provisioning (signed)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        // Public catalog and bulk reorder.
        .nest("/categories", categories::router())
        // Owner-scoped category management.
        .nest("/category", category::router())
        // Owner-scoped products.
        .nest("/products", products::router())
        // Media host upload/delete, with a raised body limit.
        .nest("/media", media::router(config.media.max_upload_bytes))
        // Owner dashboard.
        .nest("/dashboard", dashboard::router())
        // Signed webhooks from the identity provider.
        .nest("/webhooks", webhooks::router())
}
