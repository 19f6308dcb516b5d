//! # Rollbook Auth
//!
//! Bearer credential types and JWT utilities for the Rollbook API.
//!
//! - [`claims`]: the claims embedded in an access token
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use rollbook_auth::{create_access_token, verify_token};
//! use rollbook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(teacher_id, "jdoe", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "jdoe");
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
