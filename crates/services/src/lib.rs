//! Service layer: composes the domain rules from `proplens-core` with the
//! repositories in `proplens-db`.
//!
//! Services hold a `PgPool` plus trait-object collaborators for the two
//! external seams (history sink, object storage). No service holds a
//! transaction open; the multi-statement operations live in the
//! repositories.

pub mod config;
pub mod effects;
pub mod final_selection;
pub mod history;
pub mod listing_case;
pub mod media;
pub mod storage;
