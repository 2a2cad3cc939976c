//! Repository for the `media_assets` table.
//!
//! Includes the hero-assignment transaction: clearing every other hero
//! flag must complete before the new one is set, and the listing's
//! denormalized `cover_image_url` is mirrored in the same transaction.

use sqlx::PgPool;

use proplens_core::types::DbId;

use crate::models::media_asset::{CreateMediaAsset, MediaAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, listing_case_id, media_type, url, uploader_user_id, \
    is_hero, is_selected, is_deleted, uploaded_at";

/// Provides CRUD and hero management for media assets.
pub struct MediaAssetRepo;

impl MediaAssetRepo {
    /// Register a batch of uploaded media objects for one listing.
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[CreateMediaAsset],
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let mut created = Vec::with_capacity(inputs.len());
        let query = format!(
            "INSERT INTO media_assets (listing_case_id, media_type, url, uploader_user_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        for input in inputs {
            let row = sqlx::query_as::<_, MediaAsset>(&query)
                .bind(input.listing_case_id)
                .bind(input.media_type)
                .bind(&input.url)
                .bind(input.uploader_user_id)
                .fetch_one(pool)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// Find a media asset by ID, including soft-deleted rows (callers
    /// decide how a deleted asset is reported).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_assets WHERE id = $1");
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of ids to live (non-deleted) media rows. Missing or
    /// deleted ids are simply absent from the result; the caller compares
    /// counts for its all-or-nothing validation.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_assets WHERE id = ANY($1) AND NOT is_deleted"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List the live media of a listing, hero first, then newest upload.
    pub async fn list_by_listing(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_assets \
             WHERE listing_case_id = $1 AND NOT is_deleted \
             ORDER BY is_hero DESC, is_selected DESC, uploaded_at DESC"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(listing_case_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete one media asset. Returns `true` if a live row was
    /// flagged.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE media_assets SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Make `media_id` the single hero of `listing_case_id` and mirror
    /// its URL onto the listing's `cover_image_url`.
    ///
    /// Clear-all runs before set-one inside one transaction; two
    /// concurrent calls serialize at the row locks and the later commit
    /// wins with exactly one hero remaining.
    pub async fn assign_hero(
        pool: &PgPool,
        listing_case_id: DbId,
        media_id: DbId,
        url: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE media_assets SET is_hero = FALSE WHERE listing_case_id = $1 AND is_hero")
            .bind(listing_case_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE media_assets SET is_hero = TRUE WHERE id = $1")
            .bind(media_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE listing_cases SET cover_image_url = $2 WHERE id = $1")
            .bind(listing_case_id)
            .bind(url)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }
}
