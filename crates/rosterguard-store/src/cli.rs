//! CLI module for rosterguard-store.
//!
//! Read-only operator tooling over the same queries the bot runs. It can be
//! used either as a standalone binary or as a subcommand of the main
//! rosterguard CLI.
//!
//! # Usage
//!
//! ```bash
//! # Which website user is linked to a Discord id?
//! rosterguard-store lookup -d mysql://wp:pw@localhost/wordpress 218516372498612224
//!
//! # Which website users count as premium right now?
//! rosterguard-store premium -d mysql://wp:pw@localhost/wordpress --format json
//! ```

use clap::{Parser, Subcommand};
use rosterguard_core::defaults::{
    CAPABILITIES_META_SUFFIX, DEFAULT_EXTERNAL_ID_META_KEY, DEFAULT_PREMIUM_MARKERS,
    DEFAULT_TABLE_PREFIX,
};
use rosterguard_core::ExternalMemberId;
use tabled::{Table, Tabled};

use crate::sql::{SqlIdentityStore, SqlStoreConfig};
use crate::traits::IdentityStore;

/// Identity store inspection CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rosterguard-store",
    version,
    about = "Inspect WordPress identity links and premium roles"
)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommands,
}

/// Connection options shared by every subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database connection URL.
    #[arg(short, long, env = "ROSTERGUARD_DATABASE_URL", hide_env_values = true)]
    pub database: String,

    /// WordPress table prefix.
    #[arg(long, default_value = DEFAULT_TABLE_PREFIX)]
    pub table_prefix: String,
}

/// Store CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum StoreCommands {
    /// Show the website user linked to a community id.
    Lookup {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Meta key holding linked community ids.
        #[arg(long, default_value = DEFAULT_EXTERNAL_ID_META_KEY)]
        meta_key: String,

        /// Community (Discord) member id.
        external_id: String,
    },

    /// List website users whose roles grant premium status.
    Premium {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Capabilities meta key (default: `<table-prefix>capabilities`).
        #[arg(long)]
        capabilities_key: Option<String>,

        /// Premium marker substring (repeatable; default: built-in markers).
        #[arg(long = "marker")]
        markers: Vec<String>,

        /// Output format (table, json).
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Premium row for display.
#[derive(Tabled)]
struct PremiumDisplay {
    #[tabled(rename = "User ID")]
    user_id: i64,
    #[tabled(rename = "Capabilities")]
    payload: String,
}

/// Run the store CLI with the given arguments.
///
/// This is the main entry point for the store CLI, used by both the
/// standalone binary and the unified rosterguard CLI.
pub async fn run(args: StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        StoreCommands::Lookup {
            connection,
            meta_key,
            external_id,
        } => lookup(&connection, &meta_key, &external_id).await,
        StoreCommands::Premium {
            connection,
            capabilities_key,
            markers,
            format,
        } => premium(&connection, capabilities_key, markers, &format).await,
    }
}

/// Connect to database.
async fn connect(
    connection: &ConnectionArgs,
    meta_key: Option<&str>,
) -> Result<SqlIdentityStore, Box<dyn std::error::Error>> {
    let mut config = SqlStoreConfig::new(&connection.database)
        .max_connections(1)
        .table_prefix(&connection.table_prefix);
    if let Some(key) = meta_key {
        config = config.external_id_meta_key(key);
    }
    Ok(SqlIdentityStore::connect(config).await?)
}

async fn lookup(
    connection: &ConnectionArgs,
    meta_key: &str,
    external_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect(connection, Some(meta_key)).await?;

    match store.find_user_id(&ExternalMemberId::from(external_id)).await? {
        Some(user_id) => println!("{external_id} -> website user {user_id}"),
        None => println!("{external_id} is not linked to a website user"),
    }
    Ok(())
}

async fn premium(
    connection: &ConnectionArgs,
    capabilities_key: Option<String>,
    markers: Vec<String>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect(connection, None).await?;

    let key = capabilities_key
        .unwrap_or_else(|| format!("{}{}", connection.table_prefix, CAPABILITIES_META_SUFFIX));
    let markers = if markers.is_empty() {
        DEFAULT_PREMIUM_MARKERS.iter().map(|m| (*m).to_string()).collect()
    } else {
        markers
    };

    let mut premium: Vec<_> = store
        .find_role_records(&key)
        .await?
        .into_iter()
        .filter(|r| r.has_any_marker(markers.as_slice()))
        .collect();
    premium.sort_by_key(|r| r.user_id);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&premium)?),
        "table" => {
            let rows: Vec<_> = premium
                .into_iter()
                .map(|r| PremiumDisplay {
                    user_id: r.user_id.0,
                    payload: r.payload,
                })
                .collect();
            let count = rows.len();
            println!("{}", Table::new(rows));
            println!("{count} premium user(s)");
        }
        other => return Err(format!("unknown output format: {other}").into()),
    }
    Ok(())
}
