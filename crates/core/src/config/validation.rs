//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

/// Ten years; longer lifetimes overflow the cache expiry timestamps.
pub const MAX_GEOCODE_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `listen_addr` is not a socket address
    /// - `geocode_timeout_ms` is below 100ms or above 30 seconds
    /// - `geocode_base_url` or `user_agent` is empty
    /// - `geocode_cache_ttl_secs` is 0 or above ten years
    /// - `default_radius_km` is negative or not finite
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid("listen_addr", "must be a socket address such as 0.0.0.0:8000"));
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set PROPSEARCH_DB_PATH environment variable".into(),
            });
        }

        if self.geocode_timeout_ms < 100 {
            return Err(invalid("geocode_timeout_ms", "must be at least 100ms"));
        }
        if self.geocode_timeout_ms > 30_000 {
            return Err(invalid("geocode_timeout_ms", "must not exceed 30 seconds (30000ms)"));
        }

        if self.geocode_base_url.trim().is_empty() {
            return Err(invalid("geocode_base_url", "must not be empty"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.geocode_cache_ttl_secs == 0 {
            return Err(invalid("geocode_cache_ttl_secs", "must be at least 1 second"));
        }
        if self.geocode_cache_ttl_secs > MAX_GEOCODE_CACHE_TTL_SECS {
            return Err(invalid("geocode_cache_ttl_secs", "must not exceed ten years"));
        }

        if !self.default_radius_km.is_finite() || self.default_radius_km < 0.0 {
            return Err(invalid("default_radius_km", "must be a non-negative number"));
        }

        if self.geocode_timeout_ms > 2_000 {
            tracing::warn!(
                geocode_timeout_ms = self.geocode_timeout_ms,
                "geocoding runs inside the request path; long timeouts hold requests open"
            );
        }

        Ok(())
    }
}
