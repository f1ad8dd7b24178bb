//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TOURISM_*` environment variables or a config
//! file, in OrthoConfig's usual precedence. Every field is optional; the
//! accessors supply the defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_ALLOCATION_ATTEMPTS, LanguageCode, LanguageCodeError};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Invalid settings detected after loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid default language: {0}")]
    Language(#[from] LanguageCodeError),
    #[error("reference allocation attempts must be at least 1")]
    AllocationAttempts,
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TOURISM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// Language served when a request does not name one.
    pub default_language: Option<String>,
    /// Retries when a fresh reference id collides with an existing one.
    pub reference_allocation_attempts: Option<u32>,
    /// Skip embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS))
                .with_connection_timeout(Duration::from_secs(
                    self.db_connect_timeout_secs
                        .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
                ))
        })
    }

    /// Fallback language for reads; the source language unless overridden.
    pub fn default_language(&self) -> Result<LanguageCode, SettingsError> {
        match self.default_language.as_deref() {
            Some(code) => Ok(LanguageCode::new(code)?),
            None => Ok(LanguageCode::source()),
        }
    }

    /// Bound on reference id reservations per group creation.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::AllocationAttempts`] when set to zero.
    pub fn reference_allocation_attempts(&self) -> Result<u32, SettingsError> {
        match self.reference_allocation_attempts {
            Some(0) => Err(SettingsError::AllocationAttempts),
            Some(attempts) => Ok(attempts),
            None => Ok(DEFAULT_ALLOCATION_ATTEMPTS),
        }
    }

    /// Whether pending migrations run before the server starts.
    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }
}
