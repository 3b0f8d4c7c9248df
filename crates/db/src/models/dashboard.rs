//! Per-owner catalog counters.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DashboardStats {
    pub total_categories: i64,
    pub total_products: i64,
    pub public_categories: i64,
    pub private_categories: i64,
    pub active_products: i64,
    pub inactive_products: i64,
}
