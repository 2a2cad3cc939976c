/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User ids come from the external identity provider but share the same
/// BIGSERIAL space.
pub type UserId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
