use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub fulfillment: FulfillmentConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub user_port: u16,
    pub order_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

/// Where menu prices and restaurant addresses come from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Remote catalog service over HTTP
    Http,
    /// Direct queries against the catalog database
    Database,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    pub api_url: Option<String>,
    pub database_url: Option<String>,
}

/// Dispatch is skipped entirely when `api_url` is unset.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FulfillmentConfig {
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 { 14 }

impl Default for AuthConfig {
    fn default() -> Self {
        Self { bcrypt_cost: default_bcrypt_cost() }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `TIFFIN__DATABASE__URL=postgres://...` sets `database.url`
            .add_source(config::Environment::with_prefix("TIFFIN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
