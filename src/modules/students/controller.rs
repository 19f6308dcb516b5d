use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollbook_core::{ApiResponse, AppError, CreateOutcome};
use rollbook_models::{Student, StudentPayload};
use tracing::instrument;
use uuid::Uuid;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::JsonPayload;

#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students, wrapped in the response envelope", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Student>>>, AppError> {
    state.students.list().await
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details, wrapped in the response envelope", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    state.students.get_one(id).await
}

/// Create a student. A taken username or enrollment number yields a 200
/// fail envelope rather than an error status.
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentPayload,
    responses(
        (status = 201, description = "Student created, wrapped in the response envelope", body = Student),
        (status = 200, description = "Username or enrollment number taken (fail envelope)"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<StudentPayload>,
) -> Result<CreateOutcome<Student>, AppError> {
    state.students.create(payload).await
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = StudentPayload,
    responses(
        (status = 204, description = "Student updated"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Username or enrollment number already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, payload))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonPayload(payload): JsonPayload<StudentPayload>,
) -> Result<StatusCode, AppError> {
    state.students.update(id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.students.delete(id).await
}
