//! Well-known event names for the append-only case history.
//!
//! Stored verbatim in `case_histories.event`; renaming a constant is a
//! data migration, not a refactor.

pub const CREATED: &str = "CREATED";
pub const UPDATED: &str = "UPDATED";
pub const DELETED: &str = "DELETED";
pub const LISTING_PUBLISHED: &str = "LISTING_PUBLISHED";
pub const LISTING_PUBLISHED_AGAIN: &str = "LISTING_PUBLISHED_AGAIN";
pub const SELECTION_SUBMITTED: &str = "SELECTION_SUBMITTED";
