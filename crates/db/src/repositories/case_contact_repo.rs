//! Repository for the `case_contacts` table.

use sqlx::PgPool;

use proplens_core::types::DbId;

use crate::models::case_contact::{CaseContact, CreateCaseContact};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, listing_case_id, first_name, last_name, company_name, \
    profile_url, email, phone";

/// Provides CRUD operations for listing contacts.
pub struct CaseContactRepo;

impl CaseContactRepo {
    /// Attach a contact to a listing. The caller has already normalized
    /// the email; uniqueness per listing is enforced by
    /// `uq_case_contacts_listing_email`.
    pub async fn create(
        pool: &PgPool,
        listing_case_id: DbId,
        input: &CreateCaseContact,
    ) -> Result<CaseContact, sqlx::Error> {
        let query = format!(
            "INSERT INTO case_contacts (\
                listing_case_id, first_name, last_name, company_name, \
                profile_url, email, phone\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CaseContact>(&query)
            .bind(listing_case_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.company_name.as_deref())
            .bind(input.profile_url.as_deref())
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Whether the listing already holds a contact with this email.
    pub async fn exists_by_email(
        pool: &PgPool,
        listing_case_id: DbId,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM case_contacts \
             WHERE listing_case_id = $1 AND email = $2)",
        )
        .bind(listing_case_id)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// All contacts of a listing, ordered by last then first name.
    pub async fn list_by_listing(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<CaseContact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM case_contacts \
             WHERE listing_case_id = $1 ORDER BY last_name, first_name"
        );
        sqlx::query_as::<_, CaseContact>(&query)
            .bind(listing_case_id)
            .fetch_all(pool)
            .await
    }
}
