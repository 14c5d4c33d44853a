//! Read-only access to the website's identity records.
//!
//! This crate provides the two lookups the reconciliation engine needs from
//! a WordPress database: every capabilities row (to build the premium set)
//! and the website user linked to a given Discord id.
//!
//! # Example
//!
//! ```
//! use rosterguard_core::{ExternalMemberId, WebsiteUserId};
//! use rosterguard_store::{IdentityStore, MemoryIdentityStore};
//!
//! # async fn example() -> Result<(), rosterguard_store::StoreError> {
//! let store = MemoryIdentityStore::new();
//! store.link("218516372498612224", WebsiteUserId(42));
//!
//! let id = ExternalMemberId::from("218516372498612224");
//! assert_eq!(store.find_user_id(&id).await?, Some(WebsiteUserId(42)));
//! # Ok(())
//! # }
//! ```

pub mod cli;
mod error;
mod memory;
mod record;
pub mod sql;
mod traits;

pub use cli::StoreArgs;
pub use error::StoreError;
pub use memory::MemoryIdentityStore;
pub use record::RoleRecord;
pub use traits::IdentityStore;
