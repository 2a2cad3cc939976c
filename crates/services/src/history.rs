//! Case-history sink: the audit seam of the service layer.
//!
//! Services record events through the trait so tests can observe (or
//! break) the sink without a second database.

use async_trait::async_trait;
use sqlx::PgPool;

use proplens_core::types::{DbId, UserId};
use proplens_db::repositories::CaseHistoryRepo;

/// Receives one history event per completed operation. Implementations
/// must be cheap to call; callers wrap every call in
/// [`crate::effects::best_effort`].
#[async_trait]
pub trait CaseHistorySink: Send + Sync {
    async fn record(
        &self,
        listing_case_id: DbId,
        event: &str,
        actor_user_id: UserId,
        payload: Option<serde_json::Value>,
    ) -> Result<(), sqlx::Error>;
}

/// The production sink: appends to the `case_histories` table.
pub struct SqlCaseHistorySink {
    pool: PgPool,
}

impl SqlCaseHistorySink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseHistorySink for SqlCaseHistorySink {
    async fn record(
        &self,
        listing_case_id: DbId,
        event: &str,
        actor_user_id: UserId,
        payload: Option<serde_json::Value>,
    ) -> Result<(), sqlx::Error> {
        CaseHistoryRepo::append(
            &self.pool,
            listing_case_id,
            event,
            actor_user_id,
            payload.as_ref(),
        )
        .await
    }
}
