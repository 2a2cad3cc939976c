//! Final media selection: agents (or admins) pick the delivered set.
//!
//! A submission is replace-all: whatever was selected before, by anyone,
//! is superseded in one transaction. Reads of the final set are gated on
//! the listing having reached `Delivered`.

use std::sync::Arc;

use sqlx::PgPool;

use proplens_core::error::{CoreError, CoreResult};
use proplens_core::events;
use proplens_core::roles::RoleSet;
use proplens_core::scope::{authorize, AccessDenied, ListingAccess, ListingAction};
use proplens_core::types::{DbId, UserId};
use proplens_db::models::listing_case::ListingAccessRow;
use proplens_db::models::selected_media::FinalSelectionItem;
use proplens_db::models::status::ListingStatus;
use proplens_db::repositories::{ListingCaseRepo, MediaAssetRepo, SelectedMediaRepo};

use crate::effects::best_effort;
use crate::history::CaseHistorySink;

pub struct FinalSelectionService {
    pool: PgPool,
    history: Arc<dyn CaseHistorySink>,
}

impl FinalSelectionService {
    pub fn new(pool: PgPool, history: Arc<dyn CaseHistorySink>) -> Self {
        Self { pool, history }
    }

    /// Replace the listing's selection with `media_ids`.
    ///
    /// All-or-nothing: every id must resolve to a live media asset of this
    /// listing or the submission is rejected without touching the previous
    /// generation. Admin submissions are recorded without an agent id.
    pub async fn save_selection(
        &self,
        listing_id: DbId,
        actor: UserId,
        roles: &RoleSet,
        media_ids: &[DbId],
        mark_final: bool,
    ) -> CoreResult<()> {
        if media_ids.is_empty() {
            return Err(CoreError::BadRequest("No media selected".to_string()));
        }
        let row = self.load_access(listing_id, actor).await?;
        self.authorize(ListingAction::SubmitSelection, &row, roles, actor)?;

        let assets = MediaAssetRepo::find_by_ids(&self.pool, media_ids).await?;
        if assets.len() != media_ids.len() {
            return Err(CoreError::BadRequest(
                "Selection contains unknown or deleted media".to_string(),
            ));
        }
        if assets.iter().any(|a| a.listing_case_id != listing_id) {
            return Err(CoreError::BadRequest(
                "Selection contains media of another listing".to_string(),
            ));
        }

        // Attribution follows the Agent role: an admin who is also an
        // agent is stamped on the rows; a pure admin is not.
        let agent_id = if roles.is_agent() { Some(actor) } else { None };
        SelectedMediaRepo::replace_for_listing(&self.pool, listing_id, media_ids, agent_id, mark_final)
            .await?;
        tracing::info!(
            listing_case_id = listing_id,
            count = media_ids.len(),
            mark_final,
            "selection replaced"
        );

        best_effort(
            "history SELECTION_SUBMITTED",
            self.history.record(
                listing_id,
                events::SELECTION_SUBMITTED,
                actor,
                Some(serde_json::json!({
                    "media_ids": media_ids,
                    "is_final": mark_final,
                })),
            ),
        )
        .await;
        Ok(())
    }

    /// The final selection, oldest pick first. Only meaningful once the
    /// listing is `Delivered`; earlier reads are rejected for everyone.
    pub async fn get(
        &self,
        listing_id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<Vec<FinalSelectionItem>> {
        let row = self.load_access(listing_id, actor).await?;
        self.authorize(ListingAction::ViewSelection, &row, roles, actor)?;

        if row.status != ListingStatus::Delivered {
            return Err(CoreError::BadRequest(format!(
                "Final selection is available once the listing is Delivered (currently {})",
                row.status.label()
            )));
        }
        Ok(SelectedMediaRepo::list_final(&self.pool, listing_id).await?)
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
