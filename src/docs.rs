use rollbook_auth::Claims;
use rollbook_core::FieldError;
use rollbook_models::{
    Attendance, AttendancePayload, AttendanceStatus, ImportReport, ImportRequest, LoginRequest,
    LoginResponse, OutcomeStatus, RecordOutcome, Student, StudentPayload, StudentRow, Teacher,
    TeacherPayload, TeacherRow,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::modules::dashboard::controller::DashboardSummary;

/// Body of every error response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Present on validation failures
    pub details: Option<Vec<FieldError>>,
    /// Present on 500 responses
    pub trace: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::login_form,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::attendance::controller::list_attendance,
        crate::modules::attendance::controller::get_attendance_entry,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::dashboard::controller::get_dashboard,
        crate::modules::imports::controller::run_import,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            Claims,
            LoginRequest,
            LoginResponse,
            Teacher,
            TeacherPayload,
            Student,
            StudentPayload,
            Attendance,
            AttendancePayload,
            AttendanceStatus,
            DashboardSummary,
            ImportRequest,
            TeacherRow,
            StudentRow,
            ImportReport,
            RecordOutcome,
            OutcomeStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, logout and the current identity"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Students", description = "Student records"),
        (name = "Attendance", description = "Attendance entries"),
        (name = "Dashboard", description = "Record counts"),
        (name = "Import", description = "Bulk import of teachers and linked students")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "Record keeping for teachers, students and attendance, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_crud_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/teachers",
            "/api/teachers/{id}",
            "/api/students",
            "/api/attendance/{id}",
            "/api/import",
            "/login",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
