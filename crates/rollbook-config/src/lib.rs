//! # Rollbook Config
//!
//! Configuration types for the Rollbook API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Bind address, environment and store backend selection
//! - [`import`]: Defaults for the bulk import/link process
//!
//! # Example
//!
//! ```ignore
//! use rollbook_config::{CorsConfig, ImportConfig, JwtConfig, ServerConfig};
//!
//! // Load all configs from environment
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! let import_config = ImportConfig::from_env();
//! ```

pub mod cors;
pub mod import;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use import::ImportConfig;
pub use jwt::JwtConfig;
pub use server::{ServerConfig, StoreBackend};

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or does not parse.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
