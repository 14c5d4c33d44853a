//! Membership reconciliation between a Discord guild and WordPress roles.
//!
//! The engine links each community member to a website user (through a
//! never-invalidated [`IdentityCache`]), classifies them against the current
//! [`PremiumSnapshot`], and removes everyone who is not premium. It runs both
//! reactively ([`Reconciler::handle_join`]) and as a periodic full-roster
//! sweep ([`Reconciler::run_sweep`], driven by [`scheduler::run_sweeps`]).
//!
//! The community platform is reached only through the [`CommunityGateway`]
//! trait and the website only through
//! [`IdentityStore`](rosterguard_store::IdentityStore), so the engine runs
//! unchanged against in-memory fakes.

mod cache;
mod classifier;
mod error;
mod gateway;
mod member;
mod premium;
mod reconciler;
pub mod scheduler;

pub use cache::{CacheStats, IdentityCache};
pub use classifier::verdict_for;
pub use error::{GatewayError, ReconcileError};
pub use gateway::CommunityGateway;
pub use member::{Action, CommunityMember, MembershipVerdict};
pub use premium::{PremiumSet, PremiumSnapshot};
pub use reconciler::{Reconciler, ReconcilerSettings, SweepReport};

pub use rosterguard_core::MemberErrorPolicy;
