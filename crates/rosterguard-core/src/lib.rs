//! Core types and constants shared across rosterguard crates.
//!
//! This crate provides:
//! - Identifier newtypes for both sides of the reconciliation
//! - Default configuration values
//! - Error type constants for logging
//! - Sweep policy switches

pub mod defaults;
pub mod errors;
pub mod ids;
pub mod policy;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;
pub use ids::{CommunityRoleId, ExternalMemberId, WebsiteUserId};
pub use policy::MemberErrorPolicy;

/// Project name.
pub const PROJECT_NAME: &str = "rosterguard";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
