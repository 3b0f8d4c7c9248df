//! Category entity model and DTOs.

use catalog_core::layout::{LayoutDescriptor, ViewType};
use catalog_core::render::CategorySnapshot;
use catalog_core::tree::TreeItem;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{non_empty_references, not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_public: bool,
    pub level: i32,
    pub image_ids: Vec<String>,
    pub product_count: i32,
    pub parent_id: Option<DbId>,
    pub children_ids: Vec<DbId>,
    pub product_ids: Vec<DbId>,
    pub view_type: String,
    pub is_homepage_section: bool,
    pub layout_order: i32,
    pub section_title: Option<String>,
    pub columns: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    /// Layout descriptor read back from the stored columns. An unknown stored
    /// view type reads as grid.
    pub fn layout(&self) -> LayoutDescriptor {
        LayoutDescriptor {
            view_type: ViewType::parse_or_default(Some(&self.view_type)),
            is_homepage_section: self.is_homepage_section,
            layout_order: self.layout_order,
            section_title: self.section_title.clone(),
            columns: self.columns,
        }
    }

    pub fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            level: self.level,
            image_ids: self.image_ids.clone(),
            layout: self.layout(),
        }
    }
}

impl TreeItem for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCategory {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    #[validate(range(min = 0, message = "level must be a non-negative integer"))]
    pub level: i32,
    #[serde(default)]
    pub parent_id: Option<DbId>,
    #[validate(custom(function = "non_empty_references"))]
    pub category_image_ids: Vec<String>,
    /// Optional layout; defaults apply when absent.
    #[serde(default)]
    pub layout: Option<LayoutDescriptor>,
}

/// DTO for the full-field category update. Every field is overwritten, so
/// callers must resend unchanged values.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategory {
    pub category_id: DbId,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub is_public: bool,
    #[validate(range(min = 0, message = "level must be a non-negative integer"))]
    pub level: i32,
    pub parent_id: Option<DbId>,
    #[validate(custom(function = "non_empty_references"))]
    pub category_image_ids: Vec<String>,
}

/// DTO for deleting a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteCategory {
    pub id: DbId,
}

/// One entry of a bulk reorder.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderEntry {
    pub id: DbId,
    pub layout_order: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderCategories {
    pub reordered_categories: Vec<ReorderEntry>,
}

/// What a category delete touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub children_promoted: u64,
    pub products_deleted: u64,
}
