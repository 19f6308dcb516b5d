use axum::{Json, extract::State};
use rollbook_core::{ApiResponse, AppError};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::docs::ErrorResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    /// Username of the teacher viewing the dashboard
    pub teacher: String,
    pub teachers: usize,
    pub students: usize,
    pub attendance: usize,
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Record counts, wrapped in the response envelope", body = DashboardSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let (teachers, students, attendance) = tokio::try_join!(
        state.teachers.store().count(),
        state.students.store().count(),
        state.attendance.store().count(),
    )
    .map_err(AppError::store)?;

    Ok(Json(ApiResponse::success(
        "Dashboard",
        DashboardSummary {
            teacher: auth_user.username().to_string(),
            teachers,
            students,
            attendance,
        },
    )))
}
