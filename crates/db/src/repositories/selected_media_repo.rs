//! Repository for the `selected_media` table.
//!
//! Selection rows are owned entirely by the replace-all submission; they
//! are inserted in one generation and never updated in place.

use sqlx::PgPool;

use proplens_core::types::{DbId, UserId};

use crate::models::selected_media::{FinalSelectionItem, SelectedMedia};

/// Provides the replace-all write and the final-set read.
pub struct SelectedMediaRepo;

impl SelectedMediaRepo {
    /// Replace the listing's entire selection with a new generation.
    ///
    /// Every prior row for the listing is removed first — regardless of
    /// which agent created it, since an admin override supersedes all
    /// earlier picks — then one row per media id is inserted, all inside
    /// one transaction. `agent_id` is `None` for admin submissions.
    pub async fn replace_for_listing(
        pool: &PgPool,
        listing_case_id: DbId,
        media_ids: &[DbId],
        agent_id: Option<UserId>,
        is_final: bool,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM selected_media WHERE listing_case_id = $1")
            .bind(listing_case_id)
            .execute(&mut *tx)
            .await?;

        // One shared timestamp per generation keeps the submitted order
        // reconstructible from the id sequence.
        sqlx::query(
            "INSERT INTO selected_media \
                (listing_case_id, media_asset_id, agent_id, selected_at, is_final) \
             SELECT $1, m.media_asset_id, $3, NOW(), $4 \
             FROM UNNEST($2::bigint[]) AS m(media_asset_id)",
        )
        .bind(listing_case_id)
        .bind(media_ids)
        .bind(agent_id)
        .bind(is_final)
        .execute(&mut *tx)
        .await?;

        // Mirror the generation onto the media rows' is_selected flag.
        sqlx::query(
            "UPDATE media_assets SET is_selected = (id = ANY($2)) \
             WHERE listing_case_id = $1",
        )
        .bind(listing_case_id)
        .bind(media_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    /// All current selection rows for a listing, oldest first. Used by
    /// tests and diagnostics.
    pub async fn list_by_listing(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<SelectedMedia>, sqlx::Error> {
        sqlx::query_as::<_, SelectedMedia>(
            "SELECT id, listing_case_id, media_asset_id, agent_id, selected_at, is_final \
             FROM selected_media WHERE listing_case_id = $1 \
             ORDER BY selected_at, id",
        )
        .bind(listing_case_id)
        .fetch_all(pool)
        .await
    }

    /// The final set: rows marked final whose underlying media is not
    /// deleted, in ascending selection time.
    pub async fn list_final(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<FinalSelectionItem>, sqlx::Error> {
        sqlx::query_as::<_, FinalSelectionItem>(
            "SELECT s.media_asset_id, m.media_type, m.url, m.is_hero, \
                    s.selected_at, s.agent_id \
             FROM selected_media s \
             JOIN media_assets m ON m.id = s.media_asset_id \
             WHERE s.listing_case_id = $1 AND s.is_final AND NOT m.is_deleted \
             ORDER BY s.selected_at, s.id",
        )
        .bind(listing_case_id)
        .fetch_all(pool)
        .await
    }
}
