//! Repository for the `listing_cases` table.
//!
//! Owns the scoped paged search and the cascading soft delete. The
//! cascade's dependent record kinds are a fixed, enumerated table
//! ([`CASCADE_STEPS`]) so adding a kind is a one-line registration rather
//! than a silent omission.

use sqlx::PgPool;

use proplens_core::scope::ListingScope;
use proplens_core::types::{DbId, Timestamp, UserId};

use crate::models::listing_case::{
    CreateListingCase, ListingAccessRow, ListingCase, ListingDebugState, UpdateListingCase,
};
use crate::models::page::{ListingCaseQuery, PagedResult, SortDir};
use crate::models::status::ListingStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, title, description, street, city, state, postal_code, \
    bedrooms, bathrooms, garages, floor_area, price, latitude, longitude, \
    property_type, sale_category, status, is_deleted, \
    cover_image_url, public_url, owner_user_id, created_at";

/// Dependent record kinds touched by [`ListingCaseRepo::soft_delete_cascade`],
/// each with its own policy. Media keeps its rows (the object-storage
/// reference stays available for cleanup and audit); assignment and
/// contact rows have no value once the listing is gone and are removed.
const CASCADE_STEPS: &[(&str, &str)] = &[
    (
        "media_assets (soft delete)",
        "UPDATE media_assets SET is_deleted = TRUE \
         WHERE listing_case_id = $1 AND NOT is_deleted",
    ),
    (
        "agent_listing_cases (remove)",
        "DELETE FROM agent_listing_cases WHERE listing_case_id = $1",
    ),
    (
        "case_contacts (remove)",
        "DELETE FROM case_contacts WHERE listing_case_id = $1",
    ),
];

/// A single dynamic bind value for the search query.
enum Bind {
    Int(i64),
    I32(i32),
    I16(i16),
    Float(f64),
    Text(String),
    Time(Timestamp),
}

/// Provides CRUD, search, and the delete cascade for listing cases.
pub struct ListingCaseRepo;

impl ListingCaseRepo {
    /// Insert a new listing case in status `Created`, owned by `owner`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateListingCase,
        owner: UserId,
    ) -> Result<ListingCase, sqlx::Error> {
        let query = format!(
            "INSERT INTO listing_cases (\
                title, description, street, city, state, postal_code, \
                bedrooms, bathrooms, garages, floor_area, price, \
                latitude, longitude, property_type, sale_category, \
                status, owner_user_id\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                       $12, $13, $14, $15, $16, $17) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ListingCase>(&query)
            .bind(&input.title)
            .bind(input.description.as_deref())
            .bind(&input.street)
            .bind(&input.city)
            .bind(&input.state)
            .bind(input.postal_code)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.garages)
            .bind(input.floor_area)
            .bind(input.price)
            .bind(input.latitude.unwrap_or(0.0))
            .bind(input.longitude.unwrap_or(0.0))
            .bind(input.property_type)
            .bind(input.sale_category)
            .bind(ListingStatus::Created)
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ListingCase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listing_cases WHERE id = $1 AND NOT is_deleted");
        sqlx::query_as::<_, ListingCase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a listing by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ListingCase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listing_cases WHERE id = $1");
        sqlx::query_as::<_, ListingCase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the minimal projection the access scoper needs: owner,
    /// status, and whether `caller` is assigned as an agent. Excludes
    /// soft-deleted rows.
    pub async fn access_row(
        pool: &PgPool,
        id: DbId,
        caller: UserId,
    ) -> Result<Option<ListingAccessRow>, sqlx::Error> {
        sqlx::query_as::<_, ListingAccessRow>(
            "SELECT id, owner_user_id, status, \
                EXISTS (SELECT 1 FROM agent_listing_cases a \
                        WHERE a.listing_case_id = listing_cases.id \
                          AND a.agent_id = $2) AS assigned_to_caller \
             FROM listing_cases WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(caller)
        .fetch_optional(pool)
        .await
    }

    /// Rewrite a listing's descriptive and numeric fields. Status, owner,
    /// cover image, and publication state are untouched.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListingCase,
    ) -> Result<Option<ListingCase>, sqlx::Error> {
        let query = format!(
            "UPDATE listing_cases SET \
                title = $2, description = $3, street = $4, city = $5, \
                state = $6, postal_code = $7, bedrooms = $8, bathrooms = $9, \
                garages = $10, floor_area = $11, price = $12, \
                latitude = $13, longitude = $14, \
                property_type = $15, sale_category = $16 \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ListingCase>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.as_deref())
            .bind(&input.street)
            .bind(&input.city)
            .bind(&input.state)
            .bind(input.postal_code)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.garages)
            .bind(input.floor_area)
            .bind(input.price)
            .bind(input.latitude.unwrap_or(0.0))
            .bind(input.longitude.unwrap_or(0.0))
            .bind(input.property_type)
            .bind(input.sale_category)
            .fetch_optional(pool)
            .await
    }

    /// Persist a status change. Returns `true` if a live row was updated.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ListingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE listing_cases SET status = $2 WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist the public share URL. Written at most once per listing
    /// lifetime; repeat publishes reuse the stored value.
    pub async fn set_public_url(pool: &PgPool, id: DbId, url: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listing_cases SET public_url = $2 \
             WHERE id = $1 AND public_url IS NULL AND NOT is_deleted",
        )
        .bind(id)
        .bind(url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Scoped, filtered, sorted, paged search over live listings.
    pub async fn search(
        pool: &PgPool,
        scope: &ListingScope,
        params: &ListingCaseQuery,
    ) -> Result<PagedResult<ListingCase>, sqlx::Error> {
        let mut conditions = vec!["NOT is_deleted".to_string()];
        let mut binds: Vec<Bind> = Vec::new();
        let mut idx = 0u32;
        let mut next = |binds: &mut Vec<Bind>, b: Bind| {
            binds.push(b);
            idx += 1;
            idx
        };

        match scope {
            ListingScope::All => {}
            ListingScope::OwnedBy(owner) => {
                let n = next(&mut binds, Bind::Int(*owner));
                conditions.push(format!("owner_user_id = ${n}"));
            }
            ListingScope::AssignedTo(agent) => {
                let n = next(&mut binds, Bind::Int(*agent));
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM agent_listing_cases a \
                     WHERE a.listing_case_id = listing_cases.id AND a.agent_id = ${n})"
                ));
            }
            ListingScope::Nothing => {
                conditions.push("FALSE".to_string());
            }
        }

        if let Some(kw) = params.keyword.as_deref().filter(|s| !s.trim().is_empty()) {
            let n = next(&mut binds, Bind::Text(format!("%{}%", kw.trim())));
            conditions.push(format!(
                "(title ILIKE ${n} OR description ILIKE ${n} OR street ILIKE ${n} \
                 OR city ILIKE ${n} OR state ILIKE ${n})"
            ));
        }
        if let Some(ref city) = params.city {
            let n = next(&mut binds, Bind::Text(city.clone()));
            conditions.push(format!("city = ${n}"));
        }
        if let Some(ref state) = params.state {
            let n = next(&mut binds, Bind::Text(state.clone()));
            conditions.push(format!("state = ${n}"));
        }
        if let Some(pt) = params.property_type {
            let n = next(&mut binds, Bind::I16(pt as i16));
            conditions.push(format!("property_type = ${n}"));
        }
        if let Some(sc) = params.sale_category {
            let n = next(&mut binds, Bind::I16(sc as i16));
            conditions.push(format!("sale_category = ${n}"));
        }
        if let Some(status) = params.status {
            let n = next(&mut binds, Bind::I16(status as i16));
            conditions.push(format!("status = ${n}"));
        }
        if let Some(min) = params.min_bedrooms {
            let n = next(&mut binds, Bind::I32(min));
            conditions.push(format!("bedrooms >= ${n}"));
        }
        if let Some(max) = params.max_bedrooms {
            let n = next(&mut binds, Bind::I32(max));
            conditions.push(format!("bedrooms <= ${n}"));
        }
        if let Some(min) = params.min_price {
            let n = next(&mut binds, Bind::Float(min));
            conditions.push(format!("price >= ${n}"));
        }
        if let Some(max) = params.max_price {
            let n = next(&mut binds, Bind::Float(max));
            conditions.push(format!("price <= ${n}"));
        }
        if let Some(from) = params.created_from {
            let n = next(&mut binds, Bind::Time(from));
            conditions.push(format!("created_at >= ${n}"));
        }
        if let Some(to) = params.created_to {
            let n = next(&mut binds, Bind::Time(to));
            conditions.push(format!("created_at <= ${n}"));
        }

        let where_clause = conditions.join(" AND ");
        let order_clause = order_by(params.sort_by.as_deref(), params.sort_dir);

        let page = params.page();
        let page_size = params.page_size();
        let offset = (page - 1) * page_size;

        let count_sql = format!("SELECT COUNT(*) FROM listing_cases WHERE {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for b in &binds {
            count_q = match b {
                Bind::Int(v) => count_q.bind(*v),
                Bind::I32(v) => count_q.bind(*v),
                Bind::I16(v) => count_q.bind(*v),
                Bind::Float(v) => count_q.bind(*v),
                Bind::Text(v) => count_q.bind(v.clone()),
                Bind::Time(v) => count_q.bind(*v),
            };
        }
        let total = count_q.fetch_one(pool).await?;

        let items_sql = format!(
            "SELECT {COLUMNS} FROM listing_cases WHERE {where_clause} \
             ORDER BY {order_clause} LIMIT ${} OFFSET ${}",
            idx + 1,
            idx + 2
        );
        let mut items_q = sqlx::query_as::<_, ListingCase>(&items_sql);
        for b in &binds {
            items_q = match b {
                Bind::Int(v) => items_q.bind(*v),
                Bind::I32(v) => items_q.bind(*v),
                Bind::I16(v) => items_q.bind(*v),
                Bind::Float(v) => items_q.bind(*v),
                Bind::Text(v) => items_q.bind(v.clone()),
                Bind::Time(v) => items_q.bind(*v),
            };
        }
        let items = items_q
            .bind(page_size)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(PagedResult {
            items,
            total,
            page,
            page_size,
        })
    }

    /// All-or-nothing soft delete of a listing and its dependents.
    ///
    /// Flips the listing's `is_deleted`, then applies every entry of
    /// [`CASCADE_STEPS`] inside the same transaction. Idempotent: an
    /// already-deleted listing is not flipped again and already-deleted
    /// media stay deleted, but the hard-delete steps still run so the
    /// cascade converges.
    ///
    /// Returns `false` (and does nothing) when the listing does not exist.
    pub async fn soft_delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<(bool,)> =
            sqlx::query_as("SELECT is_deleted FROM listing_cases WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((already_deleted,)) = existing else {
            return Ok(false);
        };

        if !already_deleted {
            sqlx::query("UPDATE listing_cases SET is_deleted = TRUE WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        for (kind, sql) in CASCADE_STEPS {
            let result = sqlx::query(sql).bind(id).execute(&mut *tx).await?;
            tracing::debug!(
                listing_case_id = id,
                kind,
                rows = result.rows_affected(),
                "cascade step applied"
            );
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Raw `(id, status, is_deleted)` lookup for operational diagnostics.
    /// Bypasses scope and soft-delete filters.
    pub async fn debug_state(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ListingDebugState>, sqlx::Error> {
        sqlx::query_as::<_, ListingDebugState>(
            "SELECT id, status, is_deleted FROM listing_cases WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Map the caller's sort request onto the column whitelist. Unrecognized
/// fields fall back to newest-first creation order; the tiebreak is
/// always descending creation time.
fn order_by(sort_by: Option<&str>, sort_dir: Option<SortDir>) -> String {
    let dir = match sort_dir {
        Some(SortDir::Asc) => "ASC",
        _ => "DESC",
    };
    let column = match sort_by.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("title") => "title",
        Some("city") => "city",
        Some("price") => "price",
        Some("bedrooms") => "bedrooms",
        Some("createdat") | Some("created_at") => return format!("created_at {dir}"),
        _ => return "created_at DESC".to_string(),
    };
    format!("{column} {dir}, created_at DESC")
}
