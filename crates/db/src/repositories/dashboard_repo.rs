//! Aggregate counters for the owner dashboard.

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::DashboardStats;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Count an owner's categories and products by visibility and activity.
    pub async fn stats(pool: &PgPool, owner_id: DbId) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT
                c.total      AS total_categories,
                p.total      AS total_products,
                c.public_count AS public_categories,
                c.total - c.public_count AS private_categories,
                p.active_count AS active_products,
                p.total - p.active_count AS inactive_products
             FROM
                (SELECT COUNT(*) AS total,
                        COUNT(*) FILTER (WHERE is_public) AS public_count
                   FROM categories WHERE owner_id = $1) c,
                (SELECT COUNT(*) AS total,
                        COUNT(*) FILTER (WHERE is_active) AS active_count
                   FROM products WHERE owner_id = $1) p",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
