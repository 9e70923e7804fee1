use std::env;
use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

pub mod security;

pub use security::create_security_headers_layer;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_SIGN_IN_URL: &str = "/sign-in";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LISTEN_ADDR '{value}' is not a socket address: {source}")]
    InvalidListenAddr {
        value: String,
        source: AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the in-memory store with demo data.
    pub database_url: Option<String>,
    pub listen_addr: SocketAddr,
    /// Shared secret for verifying identity-provider session tokens.
    /// Absent means every request is anonymous.
    pub session_secret: Option<String>,
    pub sign_in_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let listen_value =
            non_empty("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_value
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                value: listen_value.clone(),
                source,
            })?;

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            listen_addr,
            session_secret: non_empty("SESSION_JWT_SECRET"),
            sign_in_url: non_empty("SIGN_IN_URL").unwrap_or_else(|| DEFAULT_SIGN_IN_URL.to_string()),
        })
    }
}
