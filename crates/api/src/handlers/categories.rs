//! Handlers for the public catalog (`/categories`) plus the owner-scoped
//! bulk reorder.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::render::{render_category, CategorySnapshot, ProductSnapshot, RenderPlan};
use catalog_db::models::category::{Category, ReorderCategories};
use catalog_db::models::product::Product;
use catalog_db::repositories::{CategoryRepo, ProductRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::CurrentOwner;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PublicCategory {
    pub category: Category,
    pub children: Vec<Category>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct HomepageSections {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct Reordered {
    pub updated: u64,
}

/// Public category with its public children and active products.
async fn load_public(state: &AppState, slug: &str) -> AppResult<PublicCategory> {
    let category = CategoryRepo::find_public_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Category",
                key: slug.to_string(),
            })
        })?;

    let children = CategoryRepo::list_public_children(&state.pool, category.id).await?;
    let products = ProductRepo::list_active_by_category(&state.pool, category.id).await?;

    Ok(PublicCategory {
        category,
        children,
        products,
    })
}

/// GET /api/v1/categories/{slug}
pub async fn by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let page = load_public(&state, &slug).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/v1/categories/{slug}/view
///
/// The render plan for the category's selected view type. Image references
/// are expanded to display URLs when a media cloud name is configured.
pub async fn render_view(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let page = load_public(&state, &slug).await?;

    let children: Vec<CategorySnapshot> = page.children.iter().map(Category::snapshot).collect();
    let products: Vec<ProductSnapshot> = page.products.iter().map(Product::snapshot).collect();
    let plan: RenderPlan = render_category(
        &page.category.snapshot(),
        &children,
        &products,
        state.config.media.cloud_name.as_deref(),
    );

    Ok(Json(ApiResponse::ok(plan)))
}

/// GET /api/v1/categories/homepage
///
/// Public homepage sections ordered by `layout_order`, then id.
pub async fn homepage(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_homepage_sections(&state.pool).await?;
    Ok(Json(ApiResponse::ok(HomepageSections { categories })))
}

/// PATCH /api/v1/categories/reorder
///
/// Bulk `layout_order` update. Ids the caller does not own are skipped
/// silently; when an id repeats, the last entry wins.
pub async fn reorder(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<ReorderCategories>,
) -> AppResult<impl IntoResponse> {
    let updated =
        CategoryRepo::reorder(&state.pool, owner.id, &input.reordered_categories).await?;

    tracing::info!(
        owner_id = owner.id,
        requested = input.reordered_categories.len(),
        updated,
        "Categories reordered",
    );

    Ok(Json(ApiResponse::with_message(
        "Categories reordered successfully",
        Reordered { updated },
    )))
}
