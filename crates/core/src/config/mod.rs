//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PROPSEARCH_*)
//! 2. TOML config file (if PROPSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PROPSEARCH_*)
/// 2. TOML config file (if PROPSEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    ///
    /// Set via PROPSEARCH_LISTEN_ADDR environment variable.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to the SQLite database holding properties.
    ///
    /// Set via PROPSEARCH_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Separate SQLite file for the geocode cache.
    ///
    /// Set via PROPSEARCH_CACHE_DB_PATH. When unset the cache shares `db_path`.
    #[serde(default)]
    pub cache_db_path: Option<PathBuf>,

    /// Base URL of the geocoding provider.
    ///
    /// Set via PROPSEARCH_GEOCODE_BASE_URL environment variable.
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,

    /// API key sent to the geocoding provider, if it requires one.
    ///
    /// Set via PROPSEARCH_GEOCODE_API_KEY environment variable.
    #[serde(default)]
    pub geocode_api_key: Option<String>,

    /// Geocoding request timeout in milliseconds.
    ///
    /// Set via PROPSEARCH_GEOCODE_TIMEOUT_MS environment variable.
    #[serde(default = "default_geocode_timeout_ms")]
    pub geocode_timeout_ms: u64,

    /// User-Agent string for provider requests.
    ///
    /// Set via PROPSEARCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Lifetime of cached geocode results in seconds.
    ///
    /// Set via PROPSEARCH_GEOCODE_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_geocode_cache_ttl_secs")]
    pub geocode_cache_ttl_secs: u64,

    /// How often expired cache rows are deleted, in seconds. 0 disables.
    ///
    /// Set via PROPSEARCH_CACHE_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Search radius used when a request does not name one.
    ///
    /// Set via PROPSEARCH_DEFAULT_RADIUS_KM environment variable.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./propsearch.sqlite")
}

fn default_geocode_base_url() -> String {
    "https://geocode.maps.co".into()
}

fn default_geocode_timeout_ms() -> u64 {
    1_000
}

fn default_user_agent() -> String {
    "propsearch/0.1".into()
}

fn default_geocode_cache_ttl_secs() -> u64 {
    86_400
}

fn default_cache_sweep_interval_secs() -> u64 {
    3_600
}

fn default_radius_km() -> f64 {
    crate::nearby::DEFAULT_RADIUS_KM
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: default_db_path(),
            cache_db_path: None,
            geocode_base_url: default_geocode_base_url(),
            geocode_api_key: None,
            geocode_timeout_ms: default_geocode_timeout_ms(),
            user_agent: default_user_agent(),
            geocode_cache_ttl_secs: default_geocode_cache_ttl_secs(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            default_radius_km: default_radius_km(),
        }
    }
}

impl AppConfig {
    /// Geocoding timeout as Duration for use with reqwest.
    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_cache_ttl_secs)
    }

    /// Sweep period, or `None` when sweeping is disabled.
    pub fn cache_sweep_interval(&self) -> Option<Duration> {
        (self.cache_sweep_interval_secs > 0).then(|| Duration::from_secs(self.cache_sweep_interval_secs))
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PROPSEARCH_`
    /// 2. TOML file from `PROPSEARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PROPSEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(
            Env::prefixed("PROPSEARCH_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
