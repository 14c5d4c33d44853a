//! Configuration file loading and error types.

use std::{fs, path::Path};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("missing {0} profile")]
    MissingProfile(&'static str),
    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" | "jsonc" => {
            let stripped = json_comments::StripComments::new(data.as_bytes());
            Ok(serde_json::from_reader(stripped)?)
        }
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::Environment;

    fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "rosterguard.toml",
            r#"
environment = "dev"

[development]
guild_id = 1
admin_role_id = 2
premium_role_id = 3
log_channel_id = 4
bot_token = "token"

[development.database]
host = "localhost"
user = "wp"
name = "wordpress"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.environment, Environment::Development);
        let profile = config.profile().unwrap();
        assert_eq!(profile.guild_id, 1);
        assert_eq!(profile.database.port, 3306);
        assert_eq!(profile.database.table_prefix, "wp_");
    }

    #[test]
    fn loads_jsonc_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "rosterguard.jsonc",
            r#"{
  // production is the default environment
  "production": {
    "guild_id": 10,
    "admin_role_id": 20,
    "premium_role_id": 30,
    "log_channel_id": 40,
    "bot_token": "token",
    "database": { "url": "mysql://wp:pw@db/wordpress" }
  }
}"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.profile().unwrap().premium_role_id, 30);
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "rosterguard.yaml",
            r#"
environment: production
production:
  guild_id: 10
  admin_role_id: 20
  premium_role_id: 30
  log_channel_id: 40
  bot_token: token
  check_interval_ms: 120000
  database:
    url: "sqlite::memory:"
sweep:
  on_member_error: isolate
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.check_interval().unwrap(),
            std::time::Duration::from_millis(120_000)
        );
        assert_eq!(
            config.sweep.on_member_error,
            crate::MemberErrorPolicy::Isolate
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "rosterguard.ini", "environment = dev");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat)
        ));
    }
}
