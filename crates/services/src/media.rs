//! Media upload, delete, signed reads, and the bundle download.
//!
//! Storage writes happen before any database row exists, so a failed
//! upload leaves no dangling reference. Storage deletes are best-effort:
//! the soft-delete flag is the source of truth and an unreachable store
//! never blocks it.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use proplens_core::error::{CoreError, CoreResult};
use proplens_core::events;
use proplens_core::roles::RoleSet;
use proplens_core::scope::{authorize, AccessDenied, ListingAccess, ListingAction};
use proplens_core::types::{DbId, UserId};
use proplens_db::models::listing_case::ListingAccessRow;
use proplens_db::models::media_asset::{CreateMediaAsset, MediaAsset};
use proplens_db::models::status::MediaType;
use proplens_db::repositories::{ListingCaseRepo, MediaAssetRepo};

use crate::effects::best_effort;
use crate::history::CaseHistorySink;
use crate::storage::ObjectStorage;

/// One file in an upload request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct MediaService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
    history: Arc<dyn CaseHistorySink>,
}

impl MediaService {
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn ObjectStorage>,
        history: Arc<dyn CaseHistorySink>,
    ) -> Self {
        Self {
            pool,
            storage,
            history,
        }
    }

    /// Upload files and register them as media of the listing.
    ///
    /// Only photos may arrive in batches; every other media type is one
    /// file per call. All bytes reach storage before the first row is
    /// written.
    pub async fn upload(
        &self,
        actor: UserId,
        roles: &RoleSet,
        listing_id: DbId,
        media_type: MediaType,
        files: Vec<UploadFile>,
    ) -> CoreResult<Vec<MediaAsset>> {
        if files.is_empty() {
            return Err(CoreError::BadRequest("No files to upload".to_string()));
        }
        if files.len() > 1 && media_type != MediaType::Photo {
            return Err(CoreError::BadRequest(
                "Only photos may be uploaded in batches".to_string(),
            ));
        }
        let row = self.load_access(listing_id, actor).await?;
        self.authorize(ListingAction::UploadMedia, &row, roles, actor)?;

        let mut inputs = Vec::with_capacity(files.len());
        for file in &files {
            let path = format!(
                "listings/{listing_id}/{}/{}",
                media_dir(media_type),
                file.file_name
            );
            let url = self
                .storage
                .upload(&file.bytes, &file.content_type, &path)
                .await
                .map_err(|e| CoreError::Storage(e.to_string()))?;
            inputs.push(CreateMediaAsset {
                listing_case_id: listing_id,
                media_type,
                url,
                uploader_user_id: actor,
            });
        }

        let created = MediaAssetRepo::create_many(&self.pool, &inputs).await?;
        tracing::info!(
            listing_case_id = listing_id,
            count = created.len(),
            "media uploaded"
        );
        Ok(created)
    }

    /// Soft-delete one media asset. Returns `false` when it was already
    /// deleted. The storage object is removed best-effort.
    pub async fn delete(&self, media_id: DbId, actor: UserId, roles: &RoleSet) -> CoreResult<bool> {
        let media = MediaAssetRepo::find_by_id(&self.pool, media_id)
            .await?
            .ok_or_else(|| CoreError::media_not_found(media_id))?;
        if media.is_deleted {
            return Ok(false);
        }
        let row = self.load_access(media.listing_case_id, actor).await?;
        self.authorize(ListingAction::UploadMedia, &row, roles, actor)?;

        best_effort("storage delete", self.storage.delete(&media.url)).await;
        let flagged = MediaAssetRepo::soft_delete(&self.pool, media_id).await?;
        if flagged {
            best_effort(
                "history DELETED",
                self.history.record(
                    media.listing_case_id,
                    events::DELETED,
                    actor,
                    Some(serde_json::json!({
                        "media_id": media_id,
                        "url": media.url,
                    })),
                ),
            )
            .await;
        }
        Ok(flagged)
    }

    /// A time-limited read URL for one live media asset.
    pub async fn read_url(
        &self,
        media_id: DbId,
        actor: UserId,
        roles: &RoleSet,
        ttl: Duration,
    ) -> CoreResult<String> {
        let media = MediaAssetRepo::find_by_id(&self.pool, media_id)
            .await?
            .filter(|m| !m.is_deleted)
            .ok_or_else(|| CoreError::media_not_found(media_id))?;
        let row = self.load_access(media.listing_case_id, actor).await?;
        self.authorize(ListingAction::ViewMedia, &row, roles, actor)?;

        self.storage
            .read_url(&media.url, ttl)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))
    }

    /// Every live media of the listing zipped up, one folder per type.
    pub async fn download_bundle(
        &self,
        listing_id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<Vec<u8>> {
        let row = self.load_access(listing_id, actor).await?;
        self.authorize(ListingAction::ViewMedia, &row, roles, actor)?;

        let media = MediaAssetRepo::list_by_listing(&self.pool, listing_id).await?;
        if media.is_empty() {
            return Err(CoreError::NotFound {
                entity: "MediaAsset",
                id: listing_id,
            });
        }

        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for asset in &media {
            let bytes = self
                .storage
                .download(&asset.url)
                .await
                .map_err(|e| CoreError::Storage(e.to_string()))?;
            let name = format!("{}/{}", media_dir(asset.media_type), object_name(&asset.url));
            writer
                .start_file(name, options)
                .map_err(|e| CoreError::Storage(e.to_string()))?;
            writer
                .write_all(&bytes)
                .map_err(|e| CoreError::Storage(e.to_string()))?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| CoreError::Storage(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    async fn load_access(&self, id: DbId, caller: UserId) -> CoreResult<ListingAccessRow> {
        ListingCaseRepo::access_row(&self.pool, id, caller)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))
    }

    fn authorize(
        &self,
        action: ListingAction,
        row: &ListingAccessRow,
        roles: &RoleSet,
        actor: UserId,
    ) -> CoreResult<()> {
        let access = ListingAccess {
            owner_user_id: row.owner_user_id,
            assigned_to_caller: row.assigned_to_caller,
        };
        authorize(action, &access, roles, actor).map_err(|d| match d {
            AccessDenied::NotFound => CoreError::listing_not_found(row.id),
            AccessDenied::Forbidden(msg) => CoreError::Forbidden(msg.to_string()),
        })
    }
}

/// Folder name per media type, used for storage paths and bundle layout.
fn media_dir(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Photo => "photos",
        MediaType::Video => "videos",
        MediaType::FloorPlan => "floor_plans",
        MediaType::VrTour => "vr_tours",
    }
}

/// Last path segment of an object URL, falling back to the full URL.
fn object_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
