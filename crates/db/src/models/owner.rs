//! Owner entity model and DTOs.

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `owners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Owner {
    pub id: DbId,
    pub external_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub phone_numbers: Vec<String>,
    pub category_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile captured when an identity is first provisioned.
#[derive(Debug, Clone, Default)]
pub struct CreateOwner {
    pub external_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub phone_numbers: Vec<String>,
}
