//! Discord event wiring.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rosterguard_engine::{Reconciler, scheduler};
use rosterguard_store::sql::SqlIdentityStore;
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::gateway::{DiscordGateway, community_member};

/// Reconciler as run by the bot.
pub type DiscordReconciler = Reconciler<SqlIdentityStore, DiscordGateway>;

/// Routes gateway events into the reconciler.
pub struct Handler {
    reconciler: Arc<DiscordReconciler>,
    check_interval: Duration,
    startup_message: String,
    shutdown: CancellationToken,
    armed: AtomicBool,
}

impl Handler {
    pub fn new(
        reconciler: Arc<DiscordReconciler>,
        check_interval: Duration,
        startup_message: impl Into<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            reconciler,
            check_interval,
            startup_message: startup_message.into(),
            shutdown,
            armed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to Discord");

        match self.reconciler.gateway().resolve_handles().await {
            Ok(guild) => info!(guild = %guild, "resolved guild and log channel"),
            Err(e) => error!(error = %e, "failed to resolve guild or log channel"),
        }

        // Ready fires again after a session is re-established.
        if self.armed.swap(true, Ordering::AcqRel) {
            debug!("sweep scheduler already armed");
            return;
        }

        self.reconciler.announce(&self.startup_message).await;

        tokio::spawn(scheduler::run_sweeps(
            self.reconciler.clone(),
            self.check_interval,
            self.shutdown.clone(),
        ));
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        if new_member.guild_id != self.reconciler.gateway().guild_id() {
            return;
        }

        let member = community_member(&new_member);
        info!(member = %member.display_name, external_id = %member.id, "new member joined");
        if let Err(e) = self.reconciler.handle_join(&member).await {
            error!(
                member = %member.display_name,
                external_id = %member.id,
                error = %e,
                error_type = e.error_type(),
                "failed to handle member join"
            );
        }
    }
}
