//! Repository for the `categories` table.
//!
//! Structural writes (create, reparent, delete) keep `parent_id`,
//! `children_ids`, `owners.category_ids` and product membership consistent
//! by applying every step inside one transaction.

use std::collections::HashMap;

use catalog_core::error::CoreError;
use catalog_core::layout::LayoutDescriptor;
use catalog_core::tree::validate_reparent;
use catalog_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::RepoError;
use crate::models::category::{
    Category, CreateCategory, DeleteOutcome, ReorderEntry, UpdateCategory,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, slug, description, is_public, level, image_ids, \
                       product_count, parent_id, children_ids, product_ids, view_type, \
                       is_homepage_section, layout_order, section_title, columns, \
                       created_at, updated_at";

/// Provides tree-aware CRUD for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category and link it to its parent and owner.
    ///
    /// The parent, when given, must belong to `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateCategory,
        slug: &str,
        layout: &LayoutDescriptor,
    ) -> Result<Category, RepoError> {
        let mut tx = pool.begin().await?;

        if let Some(parent_id) = input.parent_id {
            let parent: Option<(DbId,)> = sqlx::query_as(
                "SELECT id FROM categories WHERE id = $1 AND owner_id = $2 FOR UPDATE",
            )
            .bind(parent_id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;
            if parent.is_none() {
                return Err(CoreError::NotFound {
                    entity: "Category",
                    id: parent_id,
                }
                .into());
            }
        }

        let query = format!(
            "INSERT INTO categories
                (owner_id, name, slug, description, is_public, level, image_ids, parent_id,
                 view_type, is_homepage_section, layout_order, section_title, columns)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(input.is_public)
            .bind(input.level)
            .bind(&input.category_image_ids)
            .bind(input.parent_id)
            .bind(layout.view_type.as_str())
            .bind(layout.is_homepage_section)
            .bind(layout.layout_order)
            .bind(&layout.section_title)
            .bind(layout.columns)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(parent_id) = input.parent_id {
            append_child(&mut tx, parent_id, category.id).await?;
        }

        sqlx::query("UPDATE owners SET category_ids = array_append(category_ids, $1) WHERE id = $2")
            .bind(category.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Overwrite every editable field of a category.
    ///
    /// A changed `parent_id` moves the id from the old parent's child list to
    /// the new one. The new parent must be owned by the caller and must not be
    /// the category itself or one of its descendants.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        input: &UpdateCategory,
        slug: &str,
    ) -> Result<Category, RepoError> {
        let id = input.category_id;
        let mut tx = pool.begin().await?;

        let current: Option<(Option<DbId>,)> = sqlx::query_as(
            "SELECT parent_id FROM categories WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((old_parent,)) = current else {
            return Err(CoreError::NotFound {
                entity: "Category",
                id,
            }
            .into());
        };

        if old_parent != input.parent_id {
            let parents = parent_map(&mut tx, owner_id).await?;
            validate_reparent(id, input.parent_id, &parents)?;

            if let Some(old) = old_parent {
                remove_child(&mut tx, old, id).await?;
            }
            if let Some(new) = input.parent_id {
                append_child(&mut tx, new, id).await?;
            }
        }

        let query = format!(
            "UPDATE categories SET
                name = $2,
                slug = $3,
                description = $4,
                is_public = $5,
                level = $6,
                parent_id = $7,
                image_ids = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(&input.description)
            .bind(input.is_public)
            .bind(input.level)
            .bind(input.parent_id)
            .bind(&input.category_image_ids)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Delete a category owned by `owner_id`.
    ///
    /// In one transaction: unlink from the parent's child list, unlink from
    /// the owner, promote direct children to roots, delete member products,
    /// delete the row.
    pub async fn delete(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<DeleteOutcome, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<(Option<DbId>,)> = sqlx::query_as(
            "SELECT parent_id FROM categories WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((parent_id,)) = current else {
            return Err(CoreError::NotFound {
                entity: "Category",
                id,
            }
            .into());
        };

        if let Some(parent_id) = parent_id {
            remove_child(&mut tx, parent_id, id).await?;
        }

        sqlx::query("UPDATE owners SET category_ids = array_remove(category_ids, $1) WHERE id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        let children_promoted = sqlx::query("UPDATE categories SET parent_id = NULL WHERE parent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let products_deleted = sqlx::query("DELETE FROM products WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            category_id = id,
            children_promoted,
            products_deleted,
            "Category delete cascade applied"
        );

        Ok(DeleteOutcome {
            children_promoted,
            products_deleted,
        })
    }

    /// All categories of an owner in storage order.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find a category by id, scoped to its owner.
    ///
    /// Returns `None` both when the row is absent and when it belongs to
    /// another owner.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a public category by slug.
    pub async fn find_public_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1 AND is_public");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Public direct children of a category in storage order.
    pub async fn list_public_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories WHERE parent_id = $1 AND is_public ORDER BY id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Public homepage sections in display order.
    pub async fn list_homepage_sections(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE is_public AND is_homepage_section
             ORDER BY layout_order, id"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Set `layout_order` for each entry owned by `owner_id`.
    ///
    /// Entries naming categories of other owners (or no category at all) are
    /// skipped silently. When an id repeats, the last entry wins. Returns the
    /// number of rows updated.
    pub async fn reorder(
        pool: &PgPool,
        owner_id: DbId,
        entries: &[ReorderEntry],
    ) -> Result<u64, sqlx::Error> {
        let latest: HashMap<DbId, i32> = entries.iter().map(|e| (e.id, e.layout_order)).collect();
        let (ids, orders): (Vec<DbId>, Vec<i32>) = latest.into_iter().unzip();

        let result = sqlx::query(
            "UPDATE categories AS c SET layout_order = v.layout_order
             FROM UNNEST($1::BIGINT[], $2::INTEGER[]) AS v(id, layout_order)
             WHERE c.id = v.id AND c.owner_id = $3",
        )
        .bind(&ids)
        .bind(&orders)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Replace the layout descriptor of a category.
    ///
    /// Returns `None` if the category is absent or owned by someone else.
    pub async fn update_layout(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        layout: &LayoutDescriptor,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                view_type = $3,
                is_homepage_section = $4,
                layout_order = $5,
                section_title = $6,
                columns = $7
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(layout.view_type.as_str())
            .bind(layout.is_homepage_section)
            .bind(layout.layout_order)
            .bind(&layout.section_title)
            .bind(layout.columns)
            .fetch_optional(pool)
            .await
    }
}

/// Current parent of every category of an owner, locked for the rest of the
/// transaction so concurrent reparents cannot build a cycle between them.
async fn parent_map(
    conn: &mut PgConnection,
    owner_id: DbId,
) -> Result<HashMap<DbId, Option<DbId>>, sqlx::Error> {
    let rows: Vec<(DbId, Option<DbId>)> =
        sqlx::query_as("SELECT id, parent_id FROM categories WHERE owner_id = $1 FOR UPDATE")
            .bind(owner_id)
            .fetch_all(conn)
            .await?;
    Ok(rows.into_iter().collect())
}

async fn append_child(
    conn: &mut PgConnection,
    parent_id: DbId,
    child_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE categories SET children_ids = array_append(children_ids, $2)
         WHERE id = $1 AND NOT ($2 = ANY(children_ids))",
    )
    .bind(parent_id)
    .bind(child_id)
    .execute(conn)
    .await?;
    Ok(())
}

async fn remove_child(
    conn: &mut PgConnection,
    parent_id: DbId,
    child_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE categories SET children_ids = array_remove(children_ids, $2) WHERE id = $1")
        .bind(parent_id)
        .bind(child_id)
        .execute(conn)
        .await?;
    Ok(())
}
