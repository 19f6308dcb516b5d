use axum::{Json, extract::State};
use rollbook_cli::import::{ImportOptions, Reconciler};
use rollbook_core::{ApiResponse, AppError};
use rollbook_models::{ImportReport, ImportRequest};
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::JsonPayload;

/// Import teachers and link students to them.
///
/// Each newly saved teacher gets up to `max_students_per_teacher` of the
/// student rows as new students with freshly allocated enrollment numbers.
/// Rows that fail are reported, not rolled back. Options left out of the
/// request use the server's import configuration.
#[utoipa::path(
    post,
    path = "/api/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import finished, wrapped in the response envelope", body = ImportReport),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Import"
)]
#[instrument(skip(state, auth_user, request), fields(by = %auth_user.username()))]
pub async fn run_import(
    State(state): State<AppState>,
    auth_user: AuthUser,
    JsonPayload(request): JsonPayload<ImportRequest>,
) -> Result<Json<ApiResponse<ImportReport>>, AppError> {
    let mut options = ImportOptions::from(state.import_config);
    if let Some(link) = request.link_students {
        options.link_students = link;
    }
    if let Some(max) = request.max_students_per_teacher {
        options.max_students_per_teacher = max;
    }

    let reconciler = Reconciler::new(
        state.teachers.store().clone(),
        state.students.store().clone(),
        options,
    );
    let report = reconciler.run(request.teachers, request.students).await?;

    info!(
        teachers_saved = report.teachers_saved,
        students_saved = report.students_saved,
        "Import requested over HTTP finished"
    );

    Ok(Json(ApiResponse::success("Import finished", report)))
}
