//! Final-selection rows and their read-side projection.

use serde::Serialize;
use sqlx::FromRow;

use proplens_core::types::{DbId, Timestamp, UserId};

use crate::models::status::MediaType;

/// A curation row from the `selected_media` table. Rows are only ever
/// created by the replace-all submission; they are never updated in place.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SelectedMedia {
    pub id: DbId,
    pub listing_case_id: DbId,
    pub media_asset_id: DbId,
    /// NULL when an admin submitted on the listing's behalf.
    pub agent_id: Option<UserId>,
    pub selected_at: Timestamp,
    pub is_final: bool,
}

/// A final-selection row joined with its underlying (non-deleted) media.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FinalSelectionItem {
    pub media_asset_id: DbId,
    pub media_type: MediaType,
    pub url: String,
    pub is_hero: bool,
    pub selected_at: Timestamp,
    pub agent_id: Option<UserId>,
}
