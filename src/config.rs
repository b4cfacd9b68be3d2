//! Layered service configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults,
//! 2. an optional config file (`backlog.toml`, `.json`, `.yaml`, …),
//! 3. `BACKLOG_`-prefixed environment variables, `__` between nested keys
//!    (`BACKLOG_SERVER__PORT=9000`, `BACKLOG_LOGGING__LEVEL=debug`).
//!
//! Only the host process is configured here. Routes are code, not config.

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::Error;

/// Default config file name, without extension.
pub const DEFAULT_PATH: &str = "backlog";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest request body buffered before the server answers `413`.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Self::load_from(DEFAULT_PATH)
    }

    /// Loads configuration from `config_path` (extension optional; a missing
    /// file is not an error), environment and defaults.
    pub fn load_from(config_path: &str) -> Result<Self, Error> {
        let settings = ::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8443)?
            .set_default("server.max_body_bytes", 1_048_576)?
            .set_default("logging.level", "info")?
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("BACKLOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::InvalidAddr(addr))
    }
}
