//! Repository for the `owners` table.

use sqlx::PgPool;

use crate::models::owner::{CreateOwner, Owner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, username, email, full_name, avatar_url, \
                       phone_numbers, category_ids, created_at, updated_at";

/// Provides lookup and idempotent provisioning for owners.
pub struct OwnerRepo;

impl OwnerRepo {
    /// Insert an owner unless one already exists for the external id.
    ///
    /// Returns the stored row and whether it was created by this call.
    /// Repeated deliveries of the same sign-up event return the existing row
    /// untouched.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreateOwner,
    ) -> Result<(Owner, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO owners (external_id, username, email, full_name, avatar_url, phone_numbers)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (external_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Owner>(&query)
            .bind(&input.external_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.avatar_url)
            .bind(&input.phone_numbers)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(owner) => Ok((owner, true)),
            None => {
                let query = format!("SELECT {COLUMNS} FROM owners WHERE external_id = $1");
                let existing = sqlx::query_as::<_, Owner>(&query)
                    .bind(&input.external_id)
                    .fetch_one(pool)
                    .await?;
                Ok((existing, false))
            }
        }
    }

    /// Find an owner by the identity provider's user id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<Owner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM owners WHERE external_id = $1");
        sqlx::query_as::<_, Owner>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }
}
