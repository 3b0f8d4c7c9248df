//! Product entity model and DTOs.

use catalog_core::render::ProductSnapshot;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::{known_sizes, not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub owner_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub sku: String,
    pub is_active: bool,
    pub image_ids: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
    pub sizes: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            is_active: self.is_active,
            image_ids: self.image_ids.clone(),
        }
    }
}

/// Product row joined with the name of its category, for owner listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
}

/// DTO for creating a product.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    pub category_id: DbId,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must be a non-negative number"))]
    pub price: f64,
    #[validate(custom(function = "not_blank"))]
    pub sku: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub product_image_ids: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "known_sizes"))]
    pub sizes: Vec<String>,
}

fn default_active() -> bool {
    true
}

/// DTO for deleting a product. `category_id` names the category whose
/// product list should drop the id.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteProduct {
    pub product_id: DbId,
    pub category_id: DbId,
}
