//! # Rollbook DB
//!
//! Connection pool, migrations and the two [`RecordStore`] implementations:
//!
//! - [`PgStore`]: PostgreSQL, constraints enforced by the schema;
//! - [`MemoryStore`]: in-process, constraints enforced under a write lock.
//!
//! Both report a violated unique constraint or a dangling reference with the
//! same message, so callers see identical soft-failure envelopes whichever
//! backend runs.
//!
//! [`RecordStore`]: rollbook_core::RecordStore

pub mod credentials;
pub mod memory;
pub mod postgres;

use std::env;

use rollbook_core::StoreError;
use sqlx::postgres::PgPoolOptions;

pub use credentials::CredentialStore;
pub use memory::{MemoryStore, link};
pub use postgres::PgStore;
// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL pool from `DATABASE_URL`.
///
/// `DB_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;
    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
}

/// Applies the SQL migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

pub(crate) fn unique_conflict(kind: &'static str, field: &str) -> StoreError {
    StoreError::Conflict {
        kind,
        message: format!("{kind} with this {field} already exists"),
    }
}

pub(crate) fn missing_reference(kind: &'static str) -> StoreError {
    StoreError::Conflict {
        kind,
        message: format!("{kind} references a record that does not exist"),
    }
}
