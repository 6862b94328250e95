//! Startup configuration, read once from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use tokengate_auth::{KeyError, SigningKey};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("JWT_SECRET is unusable: {0}")]
    Secret(#[from] KeyError),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub signing_key: SigningKey,
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Defaults for everything except the key.
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080))),
            signing_key,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source.
    ///
    /// `JWT_SECRET` is required (base64, at least 256 bits once decoded).
    /// `BIND_ADDR` and `BCRYPT_COST` fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let mut config = Self::new(SigningKey::from_base64(&secret)?);

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                message: format!("{e}"),
            })?;
        }

        if let Some(cost) = lookup("BCRYPT_COST") {
            let cost: u32 = cost.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "BCRYPT_COST",
                message: format!("{e}"),
            })?;
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid {
                    var: "BCRYPT_COST",
                    message: format!("{cost} is outside 4..=31"),
                });
            }
            config.bcrypt_cost = cost;
        }

        Ok(config)
    }
}
