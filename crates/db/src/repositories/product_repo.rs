//! Repository for the `products` table.

use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::product::{CreateProduct, Product, ProductWithCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, category_id, name, description, price, sku, is_active, \
                       image_ids, colors, tags, sizes, created_at, updated_at";

/// [`COLUMNS`] qualified with the `p` alias for joined queries.
const JOINED_COLUMNS: &str = "p.id, p.owner_id, p.category_id, p.name, p.description, p.price, \
                              p.sku, p.is_active, p.image_ids, p.colors, p.tags, p.sizes, \
                              p.created_at, p.updated_at";

/// Provides create, delete and listing for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product into a category owned by `owner_id` and add it to the
    /// category's product list.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProduct,
    ) -> Result<Product, RepoError> {
        let mut tx = pool.begin().await?;

        let category: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM categories WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(input.category_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        if category.is_none() {
            return Err(CoreError::NotFound {
                entity: "Category",
                id: input.category_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO products
                (owner_id, category_id, name, description, price, sku, is_active,
                 image_ids, colors, tags, sizes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(owner_id)
            .bind(input.category_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.price)
            .bind(input.sku.trim())
            .bind(input.is_active)
            .bind(&input.product_image_ids)
            .bind(&input.colors)
            .bind(&input.tags)
            .bind(&input.sizes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE categories SET
                product_ids = array_append(product_ids, $1),
                product_count = product_count + 1
             WHERE id = $2",
        )
        .bind(product.id)
        .bind(input.category_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Delete a product owned by `owner_id`.
    ///
    /// The id is removed from the product's stored category and from
    /// `category_id` (when that is also owned by the caller). A category's
    /// `product_count` only drops when the id was actually in its list and
    /// never goes below zero.
    pub async fn delete(
        pool: &PgPool,
        owner_id: DbId,
        product_id: DbId,
        category_id: DbId,
    ) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId,)> = sqlx::query_as(
            "DELETE FROM products WHERE id = $1 AND owner_id = $2 RETURNING category_id",
        )
        .bind(product_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((stored_category,)) = deleted else {
            return Err(CoreError::NotFound {
                entity: "Product",
                id: product_id,
            }
            .into());
        };

        sqlx::query(
            "UPDATE categories SET
                product_ids = array_remove(product_ids, $1),
                product_count = GREATEST(product_count - 1, 0)
             WHERE id = ANY($2) AND owner_id = $3 AND $1 = ANY(product_ids)",
        )
        .bind(product_id)
        .bind(vec![stored_category, category_id])
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Products of an owner, newest first, optionally narrowed to one
    /// category. `limit` and `offset` must already be clamped.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        category_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, c.name AS category_name
             FROM products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.owner_id = $1 AND ($2::BIGINT IS NULL OR p.category_id = $2)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(owner_id)
            .bind(category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Active products of a category in storage order.
    pub async fn list_active_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products WHERE category_id = $1 AND is_active ORDER BY id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }
}
