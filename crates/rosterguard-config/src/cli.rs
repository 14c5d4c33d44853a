//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;
use crate::types::Environment;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override the active environment (development/dev, production/prod)
    #[arg(long, env = "ROSTERGUARD_ENV", value_enum)]
    pub environment: Option<Environment>,
    /// Override the Discord bot token of the active profile
    #[arg(long, env = "ROSTERGUARD_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,
    /// Override the database URL of the active profile
    #[arg(long, env = "ROSTERGUARD_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
    /// Override the sweep interval (milliseconds)
    #[arg(long)]
    pub check_interval_ms: Option<u64>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    // Environment first: the remaining overrides target the selected profile.
    if let Some(env) = overrides.environment {
        config.environment = env;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }

    let Some(profile) = config.profile_mut() else {
        return;
    };
    if let Some(v) = &overrides.bot_token {
        profile.bot_token = v.clone();
    }
    if let Some(v) = &overrides.database_url {
        profile.database.url = Some(v.clone());
    }
    if let Some(v) = overrides.check_interval_ms {
        profile.check_interval_ms = Some(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        toml::from_str(
            r#"
[development]
guild_id = 1
admin_role_id = 2
premium_role_id = 3
log_channel_id = 4

[production]
guild_id = 10
admin_role_id = 20
premium_role_id = 30
log_channel_id = 40
bot_token = "prod-token"
"#,
        )
        .unwrap()
    }

    #[test]
    fn overrides_target_selected_profile() {
        let mut config = config();
        let overrides = CliOverrides {
            environment: Some(Environment::Development),
            bot_token: Some("dev-token".into()),
            database_url: Some("sqlite::memory:".into()),
            check_interval_ms: Some(1_000),
            log_level: Some("debug".into()),
        };
        apply_overrides(&mut config, &overrides);

        assert_eq!(config.environment, Environment::Development);
        let dev = config.development.as_ref().unwrap();
        assert_eq!(dev.bot_token, "dev-token");
        assert_eq!(dev.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(dev.check_interval_ms, Some(1_000));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));

        // Production profile untouched.
        assert_eq!(config.production.as_ref().unwrap().bot_token, "prod-token");
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let mut config = config();
        apply_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config.environment, Environment::Production);
        assert!(config.logging.level.is_none());
        assert!(config.production.as_ref().unwrap().database.url.is_none());
    }
}
