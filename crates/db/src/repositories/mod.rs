//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. The three operations that
//! need multi-statement atomicity (cascade delete, hero assignment,
//! selection replace-all) own their transaction here; nothing above this
//! layer holds one open.

pub mod agent_assignment_repo;
pub mod case_contact_repo;
pub mod case_history_repo;
pub mod listing_case_repo;
pub mod media_asset_repo;
pub mod selected_media_repo;

pub use agent_assignment_repo::AgentAssignmentRepo;
pub use case_contact_repo::CaseContactRepo;
pub use case_history_repo::CaseHistoryRepo;
pub use listing_case_repo::ListingCaseRepo;
pub use media_asset_repo::MediaAssetRepo;
pub use selected_media_repo::SelectedMediaRepo;
