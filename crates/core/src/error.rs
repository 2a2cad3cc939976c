use crate::types::DbId;

/// Domain error taxonomy shared by every core operation.
///
/// `NotFound` doubles as the answer for records a caller has no visibility
/// into at all, so out-of-scope reads are indistinguishable from missing
/// rows. `Forbidden` is reserved for records the caller can see but may
/// not act on.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Structurally valid input rejected by a business rule, with a
    /// machine-readable code (e.g. `INVALID_TRANSITION`).
    #[error("Validation failed [{code}]: {message}")]
    Validation { code: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Object-storage failure on a critical path (uploads, reads).
    /// Non-critical storage calls are logged and swallowed instead.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience alias used throughout the service layer.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// A `NotFound` for a listing case, the most common entity in errors.
    pub fn listing_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "ListingCase",
            id,
        }
    }

    /// A `NotFound` for a media asset.
    pub fn media_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "MediaAsset",
            id,
        }
    }
}
