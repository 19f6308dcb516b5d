//! The generic CRUD controller.
//!
//! One [`CrudController`] is composed per entity kind; the per-kind handler
//! modules only extract request parts and delegate here, so the status codes
//! and response shapes are identical for every kind:
//!
//! | Operation | Success | Failure |
//! |-----------|---------|---------|
//! | `list`    | 200 envelope | none |
//! | `get_one` | 200 envelope | 404 |
//! | `create`  | 201 envelope | 400, or a 200 `fail` envelope on a store conflict |
//! | `update`  | 204 | 404, 400, 409 on a store conflict |
//! | `delete`  | 204 | 404 |
//!
//! Create and update report a store conflict differently. Create answers with
//! a soft failure so the caller still sees the store's message in the
//! envelope; update answers 409. Clients depend on both behaviours.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::counter;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resource::Resource;
use crate::response::ApiResponse;
use crate::store::{RecordStore, StoreError};
use crate::validation;

/// Result of a create that passed validation.
#[derive(Debug)]
pub enum CreateOutcome<E> {
    Created(E),
    /// The store refused the write; carries the store's message.
    Rejected(String),
}

impl<E: Resource> IntoResponse for CreateOutcome<E> {
    fn into_response(self) -> Response {
        match self {
            CreateOutcome::Created(record) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(format!("{} created", E::KIND), record)),
            )
                .into_response(),
            CreateOutcome::Rejected(message) => (
                StatusCode::OK,
                Json(ApiResponse::<()>::fail(message, "conflict")),
            )
                .into_response(),
        }
    }
}

pub struct CrudController<E: Resource> {
    store: Arc<dyn RecordStore<E>>,
}

impl<E: Resource> Clone for CrudController<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: Resource> std::fmt::Debug for CrudController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudController")
            .field("kind", &E::KIND)
            .finish()
    }
}

impl<E: Resource> CrudController<E> {
    pub fn new(store: Arc<dyn RecordStore<E>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore<E>> {
        &self.store
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn list(&self) -> Result<Json<ApiResponse<Vec<E>>>, AppError> {
        let records = self.store.find_all().await.map_err(AppError::store)?;
        Ok(Json(ApiResponse::success("Data Found", records)))
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn get_one(&self, id: Uuid) -> Result<Json<ApiResponse<E>>, AppError> {
        let record = self.store.find_one(id).await.map_err(AppError::store)?;
        Ok(Json(ApiResponse::success("data found (findById)", record)))
    }

    #[instrument(skip(self, payload), fields(kind = E::KIND))]
    pub async fn create(&self, payload: E::Payload) -> Result<CreateOutcome<E>, AppError> {
        // Building the candidate hashes passwords; an invalid payload stops first.
        let errors = validation::check(&payload);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let candidate = E::from_payload(Uuid::new_v4(), payload)?;
        let errors = validation::check(&candidate);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        match self.store.save(candidate).await {
            Ok(record) => {
                counter!("records_created_total", "kind" => E::KIND).increment(1);
                Ok(CreateOutcome::Created(record))
            }
            Err(StoreError::Conflict { message, .. }) => {
                warn!(kind = E::KIND, %message, "Create rejected by store");
                counter!("record_conflicts_total", "kind" => E::KIND, "operation" => "create")
                    .increment(1);
                Ok(CreateOutcome::Rejected(message))
            }
            Err(e) => Err(AppError::store(e)),
        }
    }

    #[instrument(skip(self, payload), fields(kind = E::KIND))]
    pub async fn update(&self, id: Uuid, payload: E::Payload) -> Result<StatusCode, AppError> {
        let mut record = self.store.find_one(id).await.map_err(AppError::store)?;

        let errors = validation::check(&payload);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        record.apply(payload)?;
        let errors = validation::check(&record);
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        self.store
            .save(record)
            .await
            .inspect_err(|e| {
                if e.is_conflict() {
                    warn!(kind = E::KIND, error = %e, "Update rejected by store");
                    counter!("record_conflicts_total", "kind" => E::KIND, "operation" => "update")
                        .increment(1);
                }
            })
            .map_err(AppError::store)?;

        Ok(StatusCode::NO_CONTENT)
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn delete(&self, id: Uuid) -> Result<StatusCode, AppError> {
        self.store.find_one(id).await.map_err(AppError::store)?;
        self.store.delete(id).await.map_err(AppError::store)?;
        Ok(StatusCode::NO_CONTENT)
    }
}
