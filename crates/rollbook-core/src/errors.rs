//! Application error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`. The error carries the HTTP
//! status it maps to, the underlying [`anyhow::Error`], and, for validation
//! failures, the list of offending fields.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;
use crate::validation::FieldError;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Vec<FieldError>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    /// 400 carrying one entry per failed field constraint.
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("Validation failed"),
            details,
        }
    }

    /// Maps a store failure onto its HTTP status.
    pub fn store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::not_found(err),
            StoreError::Conflict { .. } => Self::conflict(err),
            StoreError::Backend(_) => Self::internal(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error.to_string()
        });

        if !self.details.is_empty() {
            body["details"] = json!(self.details);
        }

        if self.status.is_server_error() {
            tracing::error!(error = ?self.error, "Unhandled error");
            body["trace"] = json!(format!("{:?}", self.error));
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = AppError::store(StoreError::NotFound {
            kind: "Student",
            key: Uuid::nil(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_conflict_maps_to_409() {
        let err = AppError::store(StoreError::Conflict {
            kind: "Teacher",
            message: "duplicate username".to_string(),
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_keeps_details() {
        let err = AppError::validation(vec![FieldError {
            field: "username".to_string(),
            message: "username is required".to_string(),
        }]);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.details.len(), 1);
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
