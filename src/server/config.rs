//! Server configuration.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `host:port` the TCP listener binds to.
    pub bind_address: String,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Seed a demo match with two seated players on startup.
    pub demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7878".to_string(),
            log_filter: "plum_chess_server=info".to_string(),
            demo: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "log_filter must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address
            .parse()
            .map_err(|e| ConfigError::Invalid {
                reason: format!("bind_address {:?} is not host:port ({e})", self.bind_address),
            })
    }
}
