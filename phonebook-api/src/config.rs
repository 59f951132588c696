use std::{path::PathBuf, str::FromStr};

use config::ConfigError;
use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};

use crate::domain::models::{AvatarPolicy, ListingDefaults, SortField, SortMode};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub images: ImageSettings,
    pub listing: ListingSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("database_name", &self.database_name)
            .field("require_ssl", &self.require_ssl)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ImageSettings {
    pub root: PathBuf,
    /// Placeholder avatar shipped with the frontend; never deleted.
    pub default_avatar: Option<String>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_upload_bytes: usize,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ListingSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_limit: i64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_limit: i64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_sort_by: SortField,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_sort_mode: SortMode,
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

impl ImageSettings {
    pub fn policy(&self) -> AvatarPolicy {
        AvatarPolicy {
            max_upload_bytes: self.max_upload_bytes,
            default_avatar: self
                .default_avatar
                .clone()
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

impl ListingSettings {
    pub fn defaults(&self) -> ListingDefaults {
        ListingDefaults {
            limit: self.default_limit,
            max_limit: self.max_limit,
            sort_by: self.default_sort_by,
            sort_mode: self.default_sort_mode,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit < 1 || self.max_limit < self.default_limit {
            return Err(ConfigError::Message(format!(
                "listing limits must satisfy 1 <= default_limit ({}) <= max_limit ({})",
                self.default_limit, self.max_limit
            )));
        }
        Ok(())
    }
}

pub fn read_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|err| ConfigError::Foreign(Box::new(err)))?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|err| ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {err}")))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("PHONEBOOK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    settings.listing.validate()?;
    Ok(settings)
}

#[derive(Display, Debug, EnumString, PartialEq, Eq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
