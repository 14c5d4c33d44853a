//! CLI module for the bot.
//!
//! Used by the unified rosterguard binary as the `run` subcommand.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rosterguard_config::{
    CliOverrides, Config, LoggingConfig, apply_overrides, load_config, validate_config,
};
use rosterguard_core::{CommunityRoleId, DEFAULT_DB_ACQUIRE_TIMEOUT_SECS};
use rosterguard_engine::{PremiumSet, Reconciler, ReconcilerSettings};
use rosterguard_store::sql::{SqlIdentityStore, SqlStoreConfig};
use serenity::Client;
use serenity::model::gateway::GatewayIntents;
use serenity::model::id::{ChannelId, GuildId};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::BotError;
use crate::gateway::DiscordGateway;
use crate::handler::Handler;

/// Bot CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rosterguard-bot",
    version,
    about = "Keep a Discord guild restricted to premium members"
)]
pub struct BotArgs {
    /// Config file path (json/jsonc/yaml/toml)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run the bot until SIGINT/SIGTERM.
pub async fn run(args: BotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    if let Err(e) = run_bot(&config).await {
        error!(error = %e, error_type = e.error_type(), "bot stopped");
        return Err(e.into());
    }
    Ok(())
}

async fn run_bot(config: &Config) -> Result<(), BotError> {
    let profile = config.profile()?;
    let interval = config.check_interval()?;
    info!(
        environment = %config.environment,
        "starting rosterguard {}",
        rosterguard_core::VERSION
    );
    info!(interval_ms = interval.as_millis() as u64, "premium member check interval set");

    let store_config = SqlStoreConfig::new(profile.database.connection_url()?)
        .max_connections(profile.database.connection_limit)
        .connect_timeout(Duration::from_secs(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS))
        .table_prefix(&profile.database.table_prefix)
        .external_id_meta_key(&config.identity.external_id_meta_key);
    let store = SqlIdentityStore::connect(store_config).await?;
    info!(backend = ?store.database_type(), "connected to website database");

    let shutdown = CancellationToken::new();
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    // The handler owns the reconciler, so the gateway gets its own REST client.
    let http = Arc::new(serenity::http::Http::new(&profile.bot_token));
    let gateway = DiscordGateway::new(
        http,
        GuildId::new(profile.guild_id),
        ChannelId::new(profile.log_channel_id),
    );
    let premium = PremiumSet::new(
        config.capabilities_meta_key()?,
        config.identity.premium_markers.clone(),
    );
    let settings = ReconcilerSettings {
        premium_role: CommunityRoleId(profile.premium_role_id),
        admin_role: CommunityRoleId(profile.admin_role_id),
        on_member_error: config.sweep.on_member_error,
    };
    let reconciler = Arc::new(Reconciler::new(store, gateway, premium, settings));

    // Joins are judged against this list, so it must exist before connecting.
    reconciler.refresh_premium().await?;

    let startup_message = format!(
        "Started up bot in {} environment; connected to WordPress database",
        config.environment
    );
    let handler = Handler::new(
        reconciler.clone(),
        interval,
        startup_message,
        shutdown.clone(),
    );

    let mut client = Client::builder(&profile.bot_token, intents)
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal_handler().await;
        info!("shutdown signal received");
        shutdown_signal.cancel();
        shard_manager.shutdown_all().await;
    });

    client.start().await?;

    shutdown.cancel();
    reconciler.store().close().await;
    let stats = reconciler.cache_stats();
    info!(
        cached_links = stats.size,
        hit_rate = stats.hit_rate(),
        "rosterguard stopped"
    );
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new(rosterguard_core::DEFAULT_LOG_LEVEL));

    let format = config.format.as_deref().unwrap_or("pretty");
    let output = config.output.as_deref().unwrap_or("stderr");
    let registry = tracing_subscriber::registry().with(filter);

    match (format, output) {
        ("json", "stdout") => registry.with(fmt::layer().json().with_writer(io::stdout)).init(),
        ("json", _) => registry.with(fmt::layer().json().with_writer(io::stderr)).init(),
        ("compact", "stdout") => registry
            .with(fmt::layer().compact().with_writer(io::stdout))
            .init(),
        ("compact", _) => registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init(),
        (_, "stdout") => registry.with(fmt::layer().with_writer(io::stdout)).init(),
        _ => registry.with(fmt::layer().with_writer(io::stderr)).init(),
    }
}

/// Base level followed by per-module overrides, e.g. `info,serenity=warn`.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config
        .level
        .as_deref()
        .unwrap_or(rosterguard_core::DEFAULT_LOG_LEVEL)
        .to_string();

    let mut modules: Vec<_> = config.filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        directives.push(',');
        directives.push_str(module);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let mut config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), "info");

        config.level = Some("debug".into());
        config.filters.insert("serenity".into(), "warn".into());
        config.filters.insert("sqlx".into(), "error".into());
        assert_eq!(filter_directives(&config), "debug,serenity=warn,sqlx=error");
    }

    #[test]
    fn test_args_parse() {
        let args = BotArgs::parse_from(["rosterguard-bot", "-c", "bot.yaml", "--environment", "dev"]);
        assert_eq!(args.config, PathBuf::from("bot.yaml"));
        assert!(args.overrides.environment.is_some());
    }
}
