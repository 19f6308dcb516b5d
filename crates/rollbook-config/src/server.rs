//! Server bind address, runtime environment and store selection.
//!
//! # Environment Variables
//!
//! - `HOST` (default `0.0.0.0`)
//! - `PORT` (default `3000`)
//! - `APP_ENV` (default `production`); `dev` enables the unauthenticated
//!   teacher bootstrap route
//! - `STORE_BACKEND`: `postgres` (default) or `memory`

use std::env;
use std::str::FromStr;

use crate::env_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub store_backend: StoreBackend,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            store_backend: env_or("STORE_BACKEND", StoreBackend::Postgres),
        }
    }

    pub fn is_dev(&self) -> bool {
        self.environment.eq_ignore_ascii_case("dev")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "production".to_string(),
            store_backend: StoreBackend::Postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("postgres".parse(), Ok(StoreBackend::Postgres));
        assert_eq!(" Memory ".parse(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_is_dev() {
        let mut config = ServerConfig::default();
        assert!(!config.is_dev());
        config.environment = "DEV".to_string();
        assert!(config.is_dev());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }
}
