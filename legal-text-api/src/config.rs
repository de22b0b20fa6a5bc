use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};

use crate::domain::services::LibraryConfig;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub disable_auth: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_connections: u32,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub snippet_window: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub store_timeout_ms: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub retry_backoff_ms: u64,
}

#[derive(Deserialize, Clone, Default)]
pub struct AuthSettings {
    /// Bearer token admitting mutations. Without one, mutations are refused
    /// unless auth is disabled.
    pub api_token: Option<String>,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

impl SearchSettings {
    pub fn library_config(&self) -> LibraryConfig {
        LibraryConfig {
            snippet_window: self.snippet_window,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_directory = base_path.join("config");

    let environment_name =
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
    let environment = Environment::from_str(&environment_name).map_err(|_| {
        config::ConfigError::Message(format!(
            "Failed to parse APP_ENVIRONMENT '{}', use 'local' or 'production'",
            environment_name
        ))
    })?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("LEGAL_TEXT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
