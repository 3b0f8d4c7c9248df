//! Shared query parameter types for API handlers.

use catalog_core::types::DbId;
use serde::Deserialize;

/// Query for `GET /products` (`?category_id=&limit=&offset=`).
///
/// `limit` and `offset` are clamped in the handler via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductListParams {
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
