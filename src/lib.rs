//! # rosterguard
//!
//! Keeps a Discord guild restricted to members holding a premium role on a
//! WordPress site.
//!
//! ## Crates
//!
//! - [`rosterguard_core`] - Identifier types and default values
//! - [`rosterguard_config`] - Configuration loading and validation
//! - [`rosterguard_store`] - Website identity store (SQL and in-memory)
//! - [`rosterguard_engine`] - Identity cache, premium set and reconciler
//! - [`rosterguard_discord`] - Discord gateway and bot runner

pub use rosterguard_config as config;
pub use rosterguard_core as core;
pub use rosterguard_discord as discord;
pub use rosterguard_engine as engine;
pub use rosterguard_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rosterguard_config::{Config, load_config, validate_config};
    pub use rosterguard_core::{CommunityRoleId, ExternalMemberId, WebsiteUserId};
    pub use rosterguard_engine::{
        CommunityGateway, CommunityMember, MembershipVerdict, PremiumSet, Reconciler,
        ReconcilerSettings, SweepReport,
    };
    pub use rosterguard_store::{IdentityStore, MemoryIdentityStore};
}
