//! Handles settings for the application.
//!
//! Values come from `settings.toml` (optional) and are overridden by
//! `STUDYDESK__<SECTION>__<KEY>` environment variables, e.g.
//! `STUDYDESK__AUTH__JWT_SECRET`.
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub token_ttl_secs: Option<u64>,
    pub issuer: Option<String>,
}

impl Auth {
    pub fn token_config(&self) -> accounts::TokenConfig {
        let mut config = accounts::TokenConfig::new(self.jwt_secret.clone());
        if let Some(ttl) = self.token_ttl_secs {
            config.ttl = Duration::from_secs(ttl);
        }
        if let Some(issuer) = &self.issuer {
            config.issuer = issuer.clone();
        }
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("STUDYDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
