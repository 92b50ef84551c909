//! Settings of the application.
//!
//! Read from `settings.toml` when present, then overridden by `WEBBUDGET_*`
//! environment variables (`__` separates nested keys, e.g.
//! `WEBBUDGET_APP__LEVEL=debug`).
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "webbudget.db"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub database: Option<Database>,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("WEBBUDGET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Connection string of the configured database, `./webbudget.db` when
    /// none is configured.
    pub fn database_url(&self) -> String {
        match &self.database {
            Some(Database::Memory) => String::from("sqlite::memory:"),
            Some(Database::Sqlite(path)) => format!("sqlite:{path}?mode=rwc"),
            None => String::from("sqlite:./webbudget.db?mode=rwc"),
        }
    }
}
