//! Configuration loading, CLI overrides and validation.
//!
//! A config file carries one profile per [`Environment`]; the `environment`
//! key (or `--environment`) selects which profile the bot runs with.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config};
pub use types::*;
pub use validate::validate_config;
