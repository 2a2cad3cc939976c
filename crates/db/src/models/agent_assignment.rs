//! Agent-to-listing assignment (many-to-many, composite key).

use serde::Serialize;
use sqlx::FromRow;

use proplens_core::types::{DbId, UserId};

/// A row from `agent_listing_cases`. Assignment grants an agent read and
/// curation access to the listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgentAssignment {
    pub agent_id: UserId,
    pub listing_case_id: DbId,
}
