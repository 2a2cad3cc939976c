//! Append-only audit rows for a listing case.

use serde::Serialize;
use sqlx::FromRow;

use proplens_core::types::{DbId, Timestamp, UserId};

/// A history row from the `case_histories` table. Write-only from the
/// core's perspective; the read side exists for diagnostics and tests.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseHistory {
    pub id: DbId,
    pub listing_case_id: DbId,
    pub event: String,
    pub actor_user_id: UserId,
    pub at_utc: Timestamp,
    pub payload: Option<serde_json::Value>,
}
