//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query/result types where the entity has a search surface

pub mod agent_assignment;
pub mod case_contact;
pub mod case_history;
pub mod listing_case;
pub mod media_asset;
pub mod page;
pub mod selected_media;
pub mod status;
