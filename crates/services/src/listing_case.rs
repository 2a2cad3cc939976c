//! Listing lifecycle manager.
//!
//! Owns creation, the forward-only status walk, publication, deletion,
//! scoped reads, contacts, and the cover-image pick. Authorization always
//! runs against the minimal access projection before any other work;
//! history is recorded after the database write succeeds and never fails
//! the operation.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;

use proplens_core::error::{CoreError, CoreResult};
use proplens_core::events;
use proplens_core::roles::RoleSet;
use proplens_core::scope::{
    authorize, can_create, listing_scope, AccessDenied, ListingAccess, ListingAction,
};
use proplens_core::token::public_token;
use proplens_core::types::{DbId, UserId};
use proplens_db::models::case_contact::{CaseContact, CreateCaseContact};
use proplens_db::models::listing_case::{
    CreateListingCase, ListingAccessRow, ListingCase, ListingDebugState, UpdateListingCase,
};
use proplens_db::models::media_asset::MediaAsset;
use proplens_db::models::page::{ListingCaseQuery, PagedResult};
use proplens_db::models::status::{ListingStatus, MediaType};
use proplens_db::repositories::{
    AgentAssignmentRepo, CaseContactRepo, ListingCaseRepo, MediaAssetRepo,
};

use crate::config::PublicListingConfig;
use crate::effects::best_effort;
use crate::history::CaseHistorySink;

/// A listing with its media and assigned agents, for single-case reads.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    pub listing: ListingCase,
    pub media: Vec<MediaAsset>,
    pub agent_ids: Vec<UserId>,
}

/// Non-deleted media of one type, ordered hero-first then newest.
#[derive(Debug, Clone, Serialize)]
pub struct MediaGroup {
    pub media_type: MediaType,
    pub items: Vec<MediaAsset>,
}

pub struct ListingCaseService {
    pool: PgPool,
    history: Arc<dyn CaseHistorySink>,
    config: PublicListingConfig,
}

impl ListingCaseService {
    pub fn new(pool: PgPool, history: Arc<dyn CaseHistorySink>, config: PublicListingConfig) -> Self {
        Self {
            pool,
            history,
            config,
        }
    }

    /// Create a listing owned by the caller, in status `Created`.
    pub async fn create(
        &self,
        actor: UserId,
        roles: &RoleSet,
        mut input: CreateListingCase,
    ) -> CoreResult<ListingCase> {
        if !can_create(roles) {
            return Err(CoreError::Forbidden(
                "Only Admin or PhotographyCompany can create listings".to_string(),
            ));
        }
        normalize_create(&mut input)?;

        let listing = ListingCaseRepo::create(&self.pool, &input, actor).await?;
        tracing::info!(listing_case_id = listing.id, owner = actor, "listing created");

        let payload = serde_json::json!({
            "title": listing.title,
            "property_type": listing.property_type,
            "sale_category": listing.sale_category,
            "bedrooms": listing.bedrooms,
            "bathrooms": listing.bathrooms,
        });
        best_effort(
            "history CREATED",
            self.history.record(listing.id, events::CREATED, actor, Some(payload)),
        )
        .await;
        Ok(listing)
    }

    /// Rewrite a listing's descriptive and numeric fields. Admin only.
    ///
    /// The history entry carries only the fields that actually changed,
    /// as `{field: {before, after}}`.
    pub async fn update(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
        input: UpdateListingCase,
    ) -> CoreResult<ListingCase> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::Update, &row, roles, actor)?;

        let before = ListingCaseRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))?;
        let after = ListingCaseRepo::update_fields(&self.pool, id, &input)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))?;

        let changes = field_diff(&before, &after);
        if !changes.is_empty() {
            best_effort(
                "history UPDATED",
                self.history.record(
                    id,
                    events::UPDATED,
                    actor,
                    Some(serde_json::Value::Object(changes)),
                ),
            )
            .await;
        }
        Ok(after)
    }

    /// Move the listing one step along `Created -> Pending -> Delivered`.
    ///
    /// Re-asserting the current status is a `Conflict`; any other
    /// disallowed target is a `Validation` failure naming the allowed set.
    pub async fn change_status(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
        new_status: ListingStatus,
        reason: Option<String>,
    ) -> CoreResult<ListingCase> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::ChangeStatus, &row, roles, actor)?;

        let current = row.status;
        if current == new_status {
            return Err(CoreError::Conflict(format!(
                "Listing is already in status {}",
                current.label()
            )));
        }
        if !current.can_transition_to(new_status) {
            let allowed: Vec<&str> = current.allowed_next().iter().map(|s| s.label()).collect();
            return Err(CoreError::Validation {
                code: "INVALID_TRANSITION",
                message: format!(
                    "Cannot move from {} to {}; allowed: [{}]",
                    current.label(),
                    new_status.label(),
                    allowed.join(", ")
                ),
            });
        }

        if !ListingCaseRepo::set_status(&self.pool, id, new_status).await? {
            return Err(CoreError::listing_not_found(id));
        }
        tracing::info!(
            listing_case_id = id,
            from = current.label(),
            to = new_status.label(),
            "listing status changed"
        );

        let payload = serde_json::json!({
            "type": "StatusChanged",
            "old": current.label(),
            "new": new_status.label(),
            "reason": reason,
            "changed_at": chrono::Utc::now(),
        });
        best_effort(
            "history UPDATED",
            self.history.record(id, events::UPDATED, actor, Some(payload)),
        )
        .await;

        ListingCaseRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))
    }

    /// Publish the listing: mint the share URL once and return it.
    ///
    /// Repeat publishes return the stored URL without writing it again,
    /// but every call leaves a history row (`LISTING_PUBLISHED` the first
    /// time, `LISTING_PUBLISHED_AGAIN` after).
    pub async fn publish(&self, id: DbId, actor: UserId, roles: &RoleSet) -> CoreResult<String> {
        // Role gate before any load so callers who could never publish
        // learn nothing about the listing.
        if !roles.is_admin() && !roles.is_photography_company() {
            return Err(CoreError::Forbidden(
                "Only Admin or PhotographyCompany can publish listings".to_string(),
            ));
        }
        let listing = ListingCaseRepo::find_by_id_include_deleted(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))?;
        let access = ListingAccess {
            owner_user_id: listing.owner_user_id,
            assigned_to_caller: false,
        };
        authorize(ListingAction::Publish, &access, roles, actor)
            .map_err(|d| self.deny(d, id))?;
        if listing.is_deleted {
            return Err(CoreError::BadRequest(
                "Cannot publish a deleted listing".to_string(),
            ));
        }

        if let Some(url) = listing.public_url {
            best_effort(
                "history LISTING_PUBLISHED_AGAIN",
                self.history.record(
                    id,
                    events::LISTING_PUBLISHED_AGAIN,
                    actor,
                    Some(serde_json::json!({ "url": url })),
                ),
            )
            .await;
            return Ok(url);
        }

        let url = self.config.public_url(&public_token());
        if !ListingCaseRepo::set_public_url(&self.pool, id, &url).await? {
            // Lost a publish race; the stored URL is the canonical one.
            let stored = ListingCaseRepo::find_by_id(&self.pool, id)
                .await?
                .and_then(|l| l.public_url)
                .ok_or_else(|| CoreError::listing_not_found(id))?;
            return Ok(stored);
        }
        tracing::info!(listing_case_id = id, url, "listing published");
        best_effort(
            "history LISTING_PUBLISHED",
            self.history.record(
                id,
                events::LISTING_PUBLISHED,
                actor,
                Some(serde_json::json!({ "url": url })),
            ),
        )
        .await;
        Ok(url)
    }

    /// Soft-delete the listing and cascade to its dependents. Admin only.
    pub async fn delete(&self, id: DbId, actor: UserId, roles: &RoleSet) -> CoreResult<()> {
        if !roles.is_admin() {
            return Err(CoreError::Forbidden(
                "Only Admin can delete a listing".to_string(),
            ));
        }
        if !ListingCaseRepo::soft_delete_cascade(&self.pool, id).await? {
            return Err(CoreError::listing_not_found(id));
        }
        tracing::info!(listing_case_id = id, "listing deleted with cascade");
        best_effort(
            "history DELETED",
            self.history.record(id, events::DELETED, actor, None),
        )
        .await;
        Ok(())
    }

    /// Scoped, filtered, sorted, paged search.
    pub async fn get_paged(
        &self,
        actor: UserId,
        roles: &RoleSet,
        query: &ListingCaseQuery,
    ) -> CoreResult<PagedResult<ListingCase>> {
        let scope = listing_scope(roles, actor);
        Ok(ListingCaseRepo::search(&self.pool, &scope, query).await?)
    }

    /// Single listing with media (hero-first) and assigned agent ids.
    pub async fn get_detail(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<ListingDetail> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::Read, &row, roles, actor)?;

        let listing = ListingCaseRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))?;
        let media = MediaAssetRepo::list_by_listing(&self.pool, id).await?;
        let agent_ids = AgentAssignmentRepo::list_for_listing(&self.pool, id)
            .await?
            .into_iter()
            .map(|a| a.agent_id)
            .collect();

        Ok(ListingDetail {
            listing,
            media,
            agent_ids,
        })
    }

    /// Non-deleted media grouped by type, each group hero-first.
    pub async fn get_media(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<Vec<MediaGroup>> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::ViewMedia, &row, roles, actor)?;

        let media = MediaAssetRepo::list_by_listing(&self.pool, id).await?;
        let mut groups: Vec<MediaGroup> = Vec::new();
        for asset in media {
            match groups.iter_mut().find(|g| g.media_type == asset.media_type) {
                Some(group) => group.items.push(asset),
                None => groups.push(MediaGroup {
                    media_type: asset.media_type,
                    items: vec![asset],
                }),
            }
        }
        Ok(groups)
    }

    /// Attach a contact; emails are lowercased and unique per listing.
    pub async fn add_contact(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
        mut input: CreateCaseContact,
    ) -> CoreResult<CaseContact> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::AddContact, &row, roles, actor)?;

        input.email = input.email.trim().to_lowercase();
        input.first_name = input.first_name.trim().to_string();
        input.last_name = input.last_name.trim().to_string();
        if input.email.is_empty() {
            return Err(CoreError::BadRequest("Contact email is required".to_string()));
        }
        if CaseContactRepo::exists_by_email(&self.pool, id, &input.email).await? {
            return Err(CoreError::Conflict(format!(
                "Contact with email {} already exists on this listing",
                input.email
            )));
        }
        Ok(CaseContactRepo::create(&self.pool, id, &input).await?)
    }

    /// Contacts of the listing, ordered by last then first name.
    pub async fn get_contacts(
        &self,
        id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<Vec<CaseContact>> {
        let row = self.load_access(id, actor).await?;
        self.authorize(ListingAction::ViewContacts, &row, roles, actor)?;
        Ok(CaseContactRepo::list_by_listing(&self.pool, id).await?)
    }

    /// Make a photo the listing's hero image and mirror its URL onto the
    /// listing's cover.
    pub async fn set_cover_image(
        &self,
        listing_id: DbId,
        media_id: DbId,
        actor: UserId,
        roles: &RoleSet,
    ) -> CoreResult<()> {
        let row = self.load_access(listing_id, actor).await?;
        // Cover choice is part of curation: admin or the assigned agent.
        self.authorize(ListingAction::SubmitSelection, &row, roles, actor)?;

        let media = MediaAssetRepo::find_by_id(&self.pool, media_id)
            .await?
            .ok_or_else(|| CoreError::media_not_found(media_id))?;
        if media.listing_case_id != listing_id {
            return Err(CoreError::BadRequest(
                "Media does not belong to this listing".to_string(),
            ));
        }
        if media.is_deleted {
            return Err(CoreError::BadRequest(
                "Cannot use deleted media as the cover image".to_string(),
            ));
        }
        if media.media_type != MediaType::Photo {
            return Err(CoreError::BadRequest(
                "Only a photo can be the cover image".to_string(),
            ));
        }

        MediaAssetRepo::assign_hero(&self.pool, listing_id, media_id, &media.url).await?;
        best_effort(
            "history UPDATED",
            self.history.record(
                listing_id,
                events::UPDATED,
                actor,
                Some(serde_json::json!({
                    "action": "COVER_IMAGE_SET",
                    "media_id": media_id,
                    "url": media.url,
                })),
            ),
        )
        .await;
        Ok(())
    }

    /// Raw `(id, status, is_deleted)` for operational diagnostics.
    /// Bypasses scope and soft-delete filters on purpose.
    pub async fn debug_state(&self, id: DbId) -> CoreResult<ListingDebugState> {
        ListingCaseRepo::debug_state(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))
    }

    async fn load_access(&self, id: DbId, caller: UserId) -> CoreResult<ListingAccessRow> {
        ListingCaseRepo::access_row(&self.pool, id, caller)
            .await?
            .ok_or_else(|| CoreError::listing_not_found(id))
    }

    /// The action's own denial decides NotFound vs Forbidden; only reads
    /// hide existence.
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
        authorize(action, &access, roles, actor).map_err(|d| self.deny(d, row.id))
    }

    fn deny(&self, denied: AccessDenied, id: DbId) -> CoreError {
        match denied {
            AccessDenied::NotFound => CoreError::listing_not_found(id),
            AccessDenied::Forbidden(msg) => CoreError::Forbidden(msg.to_string()),
        }
    }
}

fn normalize_create(input: &mut CreateListingCase) -> CoreResult<()> {
    input.title = input.title.trim().to_string();
    input.street = input.street.trim().to_string();
    input.city = input.city.trim().to_string();
    input.state = input.state.trim().to_string();
    input.description = input
        .description
        .take()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if input.title.is_empty() {
        return Err(CoreError::BadRequest("Title is required".to_string()));
    }
    if input.street.is_empty() || input.city.is_empty() || input.state.is_empty() {
        return Err(CoreError::BadRequest("Address is required".to_string()));
    }
    Ok(())
}

/// `{field: {before, after}}` for every field the rewrite changed.
fn field_diff(before: &ListingCase, after: &ListingCase) -> serde_json::Map<String, serde_json::Value> {
    fn entry(
        map: &mut serde_json::Map<String, serde_json::Value>,
        field: &str,
        before: serde_json::Value,
        after: serde_json::Value,
    ) {
        if before != after {
            map.insert(
                field.to_string(),
                serde_json::json!({ "before": before, "after": after }),
            );
        }
    }

    let mut map = serde_json::Map::new();
    entry(&mut map, "title", serde_json::json!(before.title), serde_json::json!(after.title));
    entry(
        &mut map,
        "description",
        serde_json::json!(before.description),
        serde_json::json!(after.description),
    );
    entry(&mut map, "street", serde_json::json!(before.street), serde_json::json!(after.street));
    entry(&mut map, "city", serde_json::json!(before.city), serde_json::json!(after.city));
    entry(&mut map, "state", serde_json::json!(before.state), serde_json::json!(after.state));
    entry(
        &mut map,
        "postal_code",
        serde_json::json!(before.postal_code),
        serde_json::json!(after.postal_code),
    );
    entry(
        &mut map,
        "bedrooms",
        serde_json::json!(before.bedrooms),
        serde_json::json!(after.bedrooms),
    );
    entry(
        &mut map,
        "bathrooms",
        serde_json::json!(before.bathrooms),
        serde_json::json!(after.bathrooms),
    );
    entry(
        &mut map,
        "garages",
        serde_json::json!(before.garages),
        serde_json::json!(after.garages),
    );
    entry(
        &mut map,
        "floor_area",
        serde_json::json!(before.floor_area),
        serde_json::json!(after.floor_area),
    );
    entry(&mut map, "price", serde_json::json!(before.price), serde_json::json!(after.price));
    entry(
        &mut map,
        "latitude",
        serde_json::json!(before.latitude),
        serde_json::json!(after.latitude),
    );
    entry(
        &mut map,
        "longitude",
        serde_json::json!(before.longitude),
        serde_json::json!(after.longitude),
    );
    entry(
        &mut map,
        "property_type",
        serde_json::json!(before.property_type),
        serde_json::json!(after.property_type),
    );
    entry(
        &mut map,
        "sale_category",
        serde_json::json!(before.sale_category),
        serde_json::json!(after.sale_category),
    );
    map
}
