//! # Rollbook Core
//!
//! Core types, errors, and the generic resource controller for the Rollbook API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The `{status, message, error, data}` response envelope
//! - [`password`]: Password hashing and verification
//! - [`validation`]: Flattened field error lists produced by `validator`
//! - [`resource`]: The [`Resource`] descriptor every entity kind implements
//! - [`store`]: The [`RecordStore`] contract persistence backends implement
//! - [`crud`]: [`CrudController`], the five CRUD operations shared by every entity
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rollbook_core::{CrudController, RecordStore};
//!
//! let store: Arc<dyn RecordStore<Student>> = Arc::new(MemoryStore::new());
//! let students = CrudController::new(store);
//!
//! let listing = students.list().await?;
//! ```

pub mod crud;
pub mod errors;
pub mod password;
pub mod resource;
pub mod response;
pub mod store;
pub mod validation;

// Re-export commonly used types at crate root
pub use crud::{CreateOutcome, CrudController};
pub use errors::AppError;
pub use password::{hash_password, verify_password};
pub use resource::Resource;
pub use response::{ApiResponse, ResponseStatus};
pub use store::{RecordStore, StoreError};
pub use validation::FieldError;
