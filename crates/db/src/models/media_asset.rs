//! Media asset entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use proplens_core::types::{DbId, Timestamp, UserId};

use crate::models::status::MediaType;

/// A media asset row from the `media_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaAsset {
    pub id: DbId,
    pub listing_case_id: DbId,
    pub media_type: MediaType,
    pub url: String,
    pub uploader_user_id: UserId,
    pub is_hero: bool,
    pub is_selected: bool,
    pub is_deleted: bool,
    pub uploaded_at: Timestamp,
}

/// DTO for registering an uploaded media object.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaAsset {
    pub listing_case_id: DbId,
    pub media_type: MediaType,
    pub url: String,
    pub uploader_user_id: UserId,
}
