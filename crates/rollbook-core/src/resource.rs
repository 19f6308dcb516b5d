//! Entity descriptor used by the generic controller and the stores.

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;

/// An entity kind managed through [`crate::CrudController`].
///
/// Two layers of validation run before any write:
///
/// - the payload's own `Validate` impl checks formats of the fields the
///   caller sent (e-mail shape, password length, ...);
/// - the record's `Validate` impl checks the assembled candidate, which is
///   where required fields are enforced. The candidate is only built once
///   the payload passes.
pub trait Resource:
    Clone + std::fmt::Debug + Serialize + Validate + Send + Sync + 'static
{
    /// Request body for create and update. Every field is optional so a
    /// missing field surfaces as a validation error instead of a decode error.
    type Payload: DeserializeOwned + Validate + Send + 'static;

    /// Human-readable kind, used in messages ("Student created").
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Builds a candidate record from a create payload.
    fn from_payload(id: Uuid, payload: Self::Payload) -> Result<Self, AppError>;

    /// Overlays the fields present in `payload` onto an existing record.
    fn apply(&mut self, payload: Self::Payload) -> Result<(), AppError>;

    /// Constrained fields as `(column, value)` pairs. Stores reject a save
    /// when another record already holds the same value for any of them.
    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Keys of records of other kinds held by this one, as `(column, key)`.
    fn references(&self) -> Vec<(&'static str, Uuid)> {
        Vec::new()
    }

    /// Drops the reference in `column` after the record it pointed at was
    /// deleted. Returns `false` when this record cannot exist without it.
    fn release_reference(&mut self, _column: &'static str) -> bool {
        false
    }
}
