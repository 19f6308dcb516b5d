use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rollbook_core::{ApiResponse, AppError, CreateOutcome};
use rollbook_models::{Attendance, AttendancePayload};
use tracing::instrument;
use uuid::Uuid;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::JsonPayload;

#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All attendance entries, wrapped in the response envelope", body = [Attendance]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn list_attendance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Attendance>>>, AppError> {
    state.attendance.list().await
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance entry ID")
    ),
    responses(
        (status = 200, description = "Attendance entry, wrapped in the response envelope", body = Attendance),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Attendance entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Attendance>>, AppError> {
    state.attendance.get_one(id).await
}

/// Record attendance for a student on a date.
///
/// On PostgreSQL an unknown `student_id` is rejected by the store and
/// reported as a 200 fail envelope, like any other store conflict.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendancePayload,
    responses(
        (status = 201, description = "Attendance recorded, wrapped in the response envelope", body = Attendance),
        (status = 200, description = "Rejected by the store (fail envelope)"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, payload))]
pub async fn create_attendance(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload<AttendancePayload>,
) -> Result<CreateOutcome<Attendance>, AppError> {
    state.attendance.create(payload).await
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance entry ID")
    ),
    request_body = AttendancePayload,
    responses(
        (status = 204, description = "Attendance entry updated"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Attendance entry not found", body = ErrorResponse),
        (status = 409, description = "Rejected by the store", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, payload))]
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonPayload(payload): JsonPayload<AttendancePayload>,
) -> Result<StatusCode, AppError> {
    state.attendance.update(id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance entry ID")
    ),
    responses(
        (status = 204, description = "Attendance entry deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Attendance entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.attendance.delete(id).await
}
