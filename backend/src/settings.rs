//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `FITQUEST_*` environment variables, command-line flags,
//! or a configuration file. Unset values fall back to the defaults below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::retry::{
    DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, RetryPolicy,
};
use crate::domain::DEFAULT_CATALOGUE_TTL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Server and CLI settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FITQUEST")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Attempts per store operation, including the first.
    pub retry_max_attempts: Option<u32>,
    pub retry_initial_backoff_ms: Option<u64>,
    pub retry_max_backoff_ms: Option<u64>,
    /// Lifetime of the cached achievement catalogue.
    pub catalogue_cache_ttl_secs: Option<u64>,
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            self.retry_initial_backoff_ms
                .map_or(DEFAULT_INITIAL_BACKOFF, Duration::from_millis),
            self.retry_max_backoff_ms
                .map_or(DEFAULT_MAX_BACKOFF, Duration::from_millis),
        )
    }

    pub fn catalogue_cache_ttl(&self) -> Duration {
        self.catalogue_cache_ttl_secs
            .map_or(DEFAULT_CATALOGUE_TTL, Duration::from_secs)
    }
}
