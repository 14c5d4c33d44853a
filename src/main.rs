//! rosterguard command line.
//!
//! ```bash
//! # Start the bot with the profile selected in the config file.
//! rosterguard run -c rosterguard.toml
//!
//! # Same config, development profile, token from the environment.
//! ROSTERGUARD_BOT_TOKEN=... rosterguard run -c rosterguard.toml --environment dev
//!
//! # Who is a given Discord member on the website?
//! rosterguard store lookup -d mysql://wp:pw@localhost/wordpress 218516372498612224
//!
//! # Which website users would survive the next sweep?
//! rosterguard store premium -d mysql://wp:pw@localhost/wordpress
//! ```
//!
//! `store` never writes; it runs the same two queries the bot uses.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rosterguard",
    version,
    about = "Keeps a Discord guild restricted to premium WordPress members",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and keep the guild limited to premium members.
    #[command(name = "run", alias = "bot")]
    Run(Box<rosterguard_discord::BotArgs>),

    /// Inspect identity links and premium members (read-only).
    #[command(name = "store")]
    Store(rosterguard_store::StoreArgs),
}

async fn dispatch(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run(args) => rosterguard_discord::cli::run(*args).await,
        Commands::Store(args) => rosterguard_store::cli::run(args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli.command).await {
        eprintln!("rosterguard: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
