//! Contact person attached to a listing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use proplens_core::types::DbId;

/// A contact row from the `case_contacts` table. Unique per listing by
/// email (enforced by `uq_case_contacts_listing_email`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseContact {
    pub id: DbId,
    pub listing_case_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub profile_url: Option<String>,
    pub email: String,
    pub phone: String,
}

/// DTO for attaching a contact to a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCaseContact {
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub profile_url: Option<String>,
    pub email: String,
    pub phone: String,
}
