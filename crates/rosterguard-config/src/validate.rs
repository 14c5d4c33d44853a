//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let profile = config.profile()?;

    if profile.bot_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "bot_token is empty (set it in the profile or ROSTERGUARD_BOT_TOKEN)".into(),
        ));
    }
    for (name, value) in [
        ("guild_id", profile.guild_id),
        ("admin_role_id", profile.admin_role_id),
        ("premium_role_id", profile.premium_role_id),
        ("log_channel_id", profile.log_channel_id),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{name} must be set")));
        }
    }
    if profile.check_interval_ms == Some(0) {
        return Err(ConfigError::Validation(
            "check_interval_ms must be > 0".into(),
        ));
    }

    let db = &profile.database;
    if !is_sql_identifier(&db.table_prefix) {
        return Err(ConfigError::Validation(format!(
            "database.table_prefix {:?} may only contain ASCII letters, digits and '_'",
            db.table_prefix
        )));
    }
    if db.connection_limit == 0 {
        return Err(ConfigError::Validation(
            "database.connection_limit must be > 0".into(),
        ));
    }
    match &db.url {
        Some(url) if url.trim().is_empty() => {
            return Err(ConfigError::Validation("database.url is empty".into()));
        }
        Some(_) => {}
        None => {
            for (name, value) in [("host", &db.host), ("user", &db.user), ("name", &db.name)] {
                if value.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "database.{name} is empty and no database.url given"
                    )));
                }
            }
        }
    }

    if config.identity.external_id_meta_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "identity.external_id_meta_key is empty".into(),
        ));
    }
    if let Some(key) = &config.identity.capabilities_meta_key
        && key.trim().is_empty()
    {
        return Err(ConfigError::Validation(
            "identity.capabilities_meta_key is empty".into(),
        ));
    }
    if config.identity.premium_markers.is_empty()
        || config.identity.premium_markers.iter().any(|m| m.is_empty())
    {
        return Err(ConfigError::Validation(
            "identity.premium_markers must be a non-empty list of non-empty strings".into(),
        ));
    }

    if let Some(format) = config.logging.format.as_deref()
        && !["pretty", "compact", "json"].contains(&format)
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: pretty, compact, json".into(),
        ));
    }
    if let Some(output) = config.logging.output.as_deref()
        && !["stdout", "stderr"].contains(&output)
    {
        return Err(ConfigError::Validation(
            "logging.output must be 'stdout' or 'stderr'".into(),
        ));
    }
    Ok(())
}

fn is_sql_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment;

    fn valid() -> Config {
        toml::from_str(
            r#"
[production]
guild_id = 1
admin_role_id = 2
premium_role_id = 3
log_channel_id = 4
bot_token = "token"

[production.database]
host = "localhost"
user = "wp"
name = "wordpress"
"#,
        )
        .unwrap()
    }

    fn validation_message(config: &Config) -> String {
        match validate_config(config) {
            Err(ConfigError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_minimal_config() {
        validate_config(&valid()).unwrap();
    }

    #[test]
    fn rejects_missing_active_profile() {
        let mut config = valid();
        config.environment = Environment::Development;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingProfile("development"))
        ));
    }

    #[test]
    fn rejects_empty_token() {
        let mut config = valid();
        config.production.as_mut().unwrap().bot_token = " ".into();
        assert!(validation_message(&config).contains("bot_token"));
    }

    #[test]
    fn rejects_unset_role() {
        let mut config = valid();
        config.production.as_mut().unwrap().premium_role_id = 0;
        assert_eq!(validation_message(&config), "premium_role_id must be set");
    }

    #[test]
    fn rejects_zero_interval() {
        let mut config = valid();
        config.production.as_mut().unwrap().check_interval_ms = Some(0);
        assert!(validation_message(&config).contains("check_interval_ms"));
    }

    #[test]
    fn rejects_injectable_table_prefix() {
        let mut config = valid();
        config.production.as_mut().unwrap().database.table_prefix = "wp_; DROP".into();
        assert!(validation_message(&config).contains("table_prefix"));
    }

    #[test]
    fn rejects_incomplete_database_descriptor() {
        let mut config = valid();
        config.production.as_mut().unwrap().database.name = String::new();
        assert!(validation_message(&config).contains("database.name"));

        config.production.as_mut().unwrap().database.url = Some("sqlite::memory:".into());
        validate_config(&config).unwrap();
    }

    #[test]
    fn rejects_empty_markers() {
        let mut config = valid();
        config.identity.premium_markers.clear();
        assert!(validation_message(&config).contains("premium_markers"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut config = valid();
        config.logging.format = Some("xml".into());
        assert!(validation_message(&config).contains("logging.format"));
    }
}
