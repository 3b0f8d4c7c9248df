//! Handlers for owner-scoped category management (`/category`).
//!
//! Every endpoint requires an authenticated owner via [`CurrentOwner`]. A
//! category that does not exist and one owned by someone else both answer
//! 404, so callers cannot probe for foreign ids.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::layout::LayoutDescriptor;
use catalog_core::slug::slug_for_name;
use catalog_core::tree::{build_category_tree, TreeNode};
use catalog_core::types::DbId;
use catalog_core::validation::validate_input;
use catalog_db::models::category::{
    Category, CreateCategory, DeleteCategory, DeleteOutcome, UpdateCategory,
};
use catalog_db::repositories::CategoryRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::CurrentOwner;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub category_id: DbId,
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoryBody {
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoryTree {
    pub categories: Vec<TreeNode<Category>>,
}

#[derive(Debug, Serialize)]
pub struct CategoryDeleted {
    pub id: DbId,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

fn category_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// POST /api/v1/category
///
/// Create a category. When `parent_id` is given the parent must belong to
/// the caller; the new id is appended to the parent's children.
pub async fn create(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let slug = slug_for_name(&input.name)?;
    let layout = input.layout.clone().unwrap_or_default().validated()?;

    let category = CategoryRepo::create(&state.pool, owner.id, &input, &slug, &layout).await?;

    tracing::info!(
        owner_id = owner.id,
        category_id = category.id,
        parent_id = ?category.parent_id,
        slug = %category.slug,
        "Category created",
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Category created successfully",
            CategoryCreated {
                category_id: category.id,
                category,
            },
        )),
    ))
}

/// GET /api/v1/category
///
/// The caller's categories as a forest. Categories whose parent is gone
/// are listed as roots.
pub async fn list_tree(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_by_owner(&state.pool, owner.id).await?;

    Ok(Json(ApiResponse::ok(CategoryTree {
        categories: build_category_tree(categories),
    })))
}

/// PUT /api/v1/category
///
/// Full-field update. A changed `parent_id` moves the id between the old
/// and new parents' children lists.
pub async fn update(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let slug = slug_for_name(&input.name)?;

    let category = CategoryRepo::update(&state.pool, owner.id, &input, &slug).await?;

    tracing::info!(
        owner_id = owner.id,
        category_id = category.id,
        parent_id = ?category.parent_id,
        "Category updated",
    );

    Ok(Json(ApiResponse::with_message(
        "Category updated successfully",
        CategoryBody { category },
    )))
}

/// DELETE /api/v1/category
///
/// Delete a category with its products. Direct children become roots.
pub async fn delete(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppJson(input): AppJson<DeleteCategory>,
) -> AppResult<impl IntoResponse> {
    let outcome = CategoryRepo::delete(&state.pool, owner.id, input.id).await?;

    tracing::info!(
        owner_id = owner.id,
        category_id = input.id,
        children_promoted = outcome.children_promoted,
        products_deleted = outcome.products_deleted,
        "Category deleted",
    );

    Ok(Json(ApiResponse::with_message(
        "Category deleted successfully",
        CategoryDeleted {
            id: input.id,
            outcome,
        },
    )))
}

/// GET /api/v1/category/{id}
pub async fn get_by_id(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_for_owner(&state.pool, id, owner.id)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    Ok(Json(ApiResponse::ok(CategoryBody { category })))
}

/// PUT /api/v1/category/{id}/layout
///
/// Replace the layout descriptor. Unknown view types are rejected by the
/// body extractor; out-of-range columns by validation.
pub async fn update_layout(
    CurrentOwner(owner): CurrentOwner,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(layout): AppJson<LayoutDescriptor>,
) -> AppResult<impl IntoResponse> {
    let layout = layout.validated()?;

    let category = CategoryRepo::update_layout(&state.pool, id, owner.id, &layout)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    tracing::info!(
        owner_id = owner.id,
        category_id = id,
        view_type = layout.view_type.as_str(),
        "Category layout updated",
    );

    Ok(Json(ApiResponse::with_message(
        "Layout updated successfully",
        CategoryBody { category },
    )))
}
