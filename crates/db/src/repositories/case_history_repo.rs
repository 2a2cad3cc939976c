//! Repository for the append-only `case_histories` table.

use sqlx::PgPool;

use proplens_core::types::{DbId, UserId};

use crate::models::case_history::CaseHistory;

/// Provides append and (diagnostic) read access to case history.
pub struct CaseHistoryRepo;

impl CaseHistoryRepo {
    /// Append one history event. Rows are never updated or removed.
    pub async fn append(
        pool: &PgPool,
        listing_case_id: DbId,
        event: &str,
        actor_user_id: UserId,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO case_histories (listing_case_id, event, actor_user_id, payload) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(listing_case_id)
        .bind(event)
        .bind(actor_user_id)
        .bind(payload)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Chronological history of a listing.
    pub async fn list_by_listing(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<CaseHistory>, sqlx::Error> {
        sqlx::query_as::<_, CaseHistory>(
            "SELECT id, listing_case_id, event, actor_user_id, at_utc, payload \
             FROM case_histories WHERE listing_case_id = $1 \
             ORDER BY at_utc, id",
        )
        .bind(listing_case_id)
        .fetch_all(pool)
        .await
    }
}
