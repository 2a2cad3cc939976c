//! Repository for the `agent_listing_cases` assignment table.

use sqlx::PgPool;

use proplens_core::types::{DbId, UserId};

use crate::models::agent_assignment::AgentAssignment;

/// Provides assignment management between agents and listing cases.
pub struct AgentAssignmentRepo;

impl AgentAssignmentRepo {
    /// Assign an agent to a listing. Idempotent: re-assigning is a no-op.
    pub async fn assign(
        pool: &PgPool,
        agent_id: UserId,
        listing_case_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO agent_listing_cases (agent_id, listing_case_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(agent_id)
        .bind(listing_case_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove an assignment. Returns `true` if a row was removed.
    pub async fn unassign(
        pool: &PgPool,
        agent_id: UserId,
        listing_case_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM agent_listing_cases WHERE agent_id = $1 AND listing_case_id = $2",
        )
        .bind(agent_id)
        .bind(listing_case_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an agent is assigned to a listing.
    pub async fn is_assigned(
        pool: &PgPool,
        agent_id: UserId,
        listing_case_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM agent_listing_cases \
             WHERE agent_id = $1 AND listing_case_id = $2)",
        )
        .bind(agent_id)
        .bind(listing_case_id)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// All assignments for a listing, used by detail projections.
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_case_id: DbId,
    ) -> Result<Vec<AgentAssignment>, sqlx::Error> {
        sqlx::query_as::<_, AgentAssignment>(
            "SELECT agent_id, listing_case_id FROM agent_listing_cases \
             WHERE listing_case_id = $1 ORDER BY agent_id",
        )
        .bind(listing_case_id)
        .fetch_all(pool)
        .await
    }
}
