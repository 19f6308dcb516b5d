//! The record store contract.
//!
//! A store owns one collection per entity kind and is the single source of
//! truth for uniqueness: callers never pre-check constrained fields, they
//! attempt the write and handle [`StoreError::Conflict`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::resource::Resource;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} with id {key} not found")]
    NotFound { kind: &'static str, key: Uuid },

    /// A constraint (unique field, foreign reference) rejected the write.
    /// Nothing was persisted.
    #[error("{message}")]
    Conflict { kind: &'static str, message: String },

    #[error("Store error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

#[async_trait]
pub trait RecordStore<E: Resource>: Send + Sync {
    async fn find_all(&self) -> Result<Vec<E>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no record has this key.
    async fn find_one(&self, id: Uuid) -> Result<E, StoreError>;

    /// Insert-or-update keyed on [`Resource::id`], atomic per record.
    async fn save(&self, record: E) -> Result<E, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.find_all().await?.len())
    }
}
