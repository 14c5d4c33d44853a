//! Discord side of rosterguard.
//!
//! [`DiscordGateway`] implements the engine's
//! [`CommunityGateway`](rosterguard_engine::CommunityGateway) on top of the
//! serenity HTTP client, [`Handler`] wires guild events to the
//! [`Reconciler`](rosterguard_engine::Reconciler), and [`cli::run`] boots
//! the whole bot from a config file.

pub mod cli;
mod error;
mod gateway;
mod handler;

pub use cli::BotArgs;
pub use error::BotError;
pub use gateway::{DiscordGateway, community_member};
pub use handler::{DiscordReconciler, Handler};
