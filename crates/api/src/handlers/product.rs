//! Handlers for owner-scoped products (`/products`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use catalog_core::types::DbId;
use catalog_core::validation::validate_input;
use catalog_db::models::product::{CreateProduct, DeleteProduct, Product, ProductWithCategory};
use catalog_db::repositories::ProductRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::CurrentOwner;
use crate::query::ProductListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub product_id: DbId,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductWithCategory>,
}

/// POST /api/v1/products
///
/// The category must belong to the caller. A reused SKU answers 409.
pub async fn create(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let product = ProductRepo::create(&state.pool, owner.id, &input).await?;

    tracing::info!(
        owner_id = owner.id,
        product_id = product.id,
        category_id = product.category_id,
        sku = %product.sku,
        "Product created",
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Product listed successfully",
            ProductCreated {
                product_id: product.id,
                product,
            },
        )),
    ))
}

/// GET /api/v1/products?category_id=&limit=&offset=
///
/// Newest first, each row carrying its category's name.
pub async fn list(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let products =
        ProductRepo::list_by_owner(&state.pool, owner.id, params.category_id, limit, offset)
            .await?;

    Ok(Json(ApiResponse::ok(ProductList { products })))
}

/// DELETE /api/v1/products
pub async fn delete(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<DeleteProduct>,
) -> AppResult<impl IntoResponse> {
    ProductRepo::delete(&state.pool, owner.id, input.product_id, input.category_id).await?;

    tracing::info!(
        owner_id = owner.id,
        product_id = input.product_id,
        category_id = input.category_id,
        "Product deleted",
    );

    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
