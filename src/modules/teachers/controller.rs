use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollbook_core::{ApiResponse, AppError, CreateOutcome};
use rollbook_models::{Teacher, TeacherPayload};
use tracing::instrument;
use uuid::Uuid;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::JsonPayload;

#[utoipa::path(
    get,
    path = "/api/teachers",
    responses(
        (status = 200, description = "All teachers, wrapped in the response envelope", body = [Teacher]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, AppError> {
    state.teachers.list().await
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher details, wrapped in the response envelope", body = Teacher),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Teacher>>, AppError> {
    state.teachers.get_one(id).await
}

/// Create a teacher.
///
/// A username that is already taken does not fail the request: the response
/// is a 200 envelope with `status: "fail"` and the store's message.
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = TeacherPayload,
    responses(
        (status = 201, description = "Teacher created, wrapped in the response envelope", body = Teacher),
        (status = 200, description = "Rejected by a unique constraint (fail envelope)"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, payload))]
pub async fn create_teacher(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<TeacherPayload>,
) -> Result<CreateOutcome<Teacher>, AppError> {
    state.teachers.create(payload).await
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body = TeacherPayload,
    responses(
        (status = 204, description = "Teacher updated"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, payload))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonPayload(payload): JsonPayload<TeacherPayload>,
) -> Result<StatusCode, AppError> {
    state.teachers.update(id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.teachers.delete(id).await
}
