//! Pure domain layer for the proplens listing-case core.
//!
//! Zero I/O: ids, timestamps, the error taxonomy, the role set and access
//! scoper, history event names, and publish-token generation. Everything
//! here is usable from the repository and service layers alike.

pub mod error;
pub mod events;
pub mod roles;
pub mod scope;
pub mod token;
pub mod types;
