//! adhub/crates/adhub-core/src/lib.rs
//!
//! The central domain logic and port definitions for adhub: entity state
//! machines, command types, and the collaborator contracts the handlers
//! depend on.

pub mod commands;
pub mod error;
pub mod models;
pub mod traits;
pub mod users;

// Re-exporting for easier access in other crates. Commands stay behind
// their module because some names (e.g. `Report`) shadow entity names.
pub use error::*;
pub use models::*;
pub use traits::*;
pub use users::*;
