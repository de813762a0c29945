//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use crate::game::layout::LayoutKind;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origin(s) for CORS, comma separated
    pub client_origin: String,

    /// Grid width in squares
    pub world_width: i32,
    /// Grid height in squares
    pub world_height: i32,
    /// Seed for player placement; random when unset
    pub world_seed: Option<u64>,
    /// Terrain layout strategy
    pub world_layout: LayoutKind,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            world_width: parse_extent("WORLD_WIDTH", 16)?,
            world_height: parse_extent("WORLD_HEIGHT", 16)?,

            world_seed: match env::var("WORLD_SEED") {
                Ok(v) => Some(
                    v.parse()
                        .map_err(|_| ConfigError::InvalidNumber("WORLD_SEED"))?,
                ),
                Err(_) => None,
            },

            world_layout: match env::var("WORLD_LAYOUT") {
                Ok(v) => v.parse().map_err(ConfigError::InvalidLayout)?,
                Err(_) => LayoutKind::default(),
            },
        })
    }
}

fn parse_extent(var: &'static str, default: i32) -> Result<i32, ConfigError> {
    match env::var(var) {
        Ok(v) => {
            let n: i32 = v.parse().map_err(|_| ConfigError::InvalidNumber(var))?;
            if n <= 0 {
                return Err(ConfigError::InvalidNumber(var));
            }
            Ok(n)
        }
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("Invalid numeric value for {0}")]
    InvalidNumber(&'static str),

    #[error("Invalid WORLD_LAYOUT: {0}")]
    InvalidLayout(String),
}
