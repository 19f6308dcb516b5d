use anyhow::anyhow;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use rollbook_auth::{Claims, create_access_token};
use rollbook_core::{AppError, verify_password};
use rollbook_models::{LoginRequest, LoginResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::docs::ErrorResponse;
use crate::middleware::auth::{AuthUser, SESSION_COOKIE};
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn invalid_credentials() -> AppError {
    AppError::unauthorized(anyhow!("Invalid username or password"))
}

/// Exchange a username and password for a bearer token.
///
/// The token is returned in the body and also set as the `token` session
/// cookie.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let teacher = state
        .credentials
        .find_teacher_by_username(&request.username)
        .await
        .map_err(AppError::store)?;

    let Some(teacher) = teacher else {
        warn!("Login failed: unknown username");
        counter!("logins_total", "status" => "failure").increment(1);
        return Err(invalid_credentials());
    };

    if !verify_password(&request.password, &teacher.password)? {
        warn!("Login failed: wrong password");
        counter!("logins_total", "status" => "failure").increment(1);
        return Err(invalid_credentials());
    }

    let access_token = create_access_token(teacher.id, &teacher.username, &state.jwt_config)?;
    counter!("logins_total", "status" => "success").increment(1);
    info!(teacher_id = %teacher.id, "Login successful");

    let cookie = Cookie::build((SESSION_COOKIE, access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_config.access_token_expiry,
            teacher,
        }),
    ))
}

/// Describes the login form. Callers that are already logged in are
/// redirected to the dashboard before this runs.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form description"),
        (status = 303, description = "Already logged in, redirected to the dashboard")
    ),
    tag = "Authentication"
)]
pub async fn login_form() -> impl IntoResponse {
    Json(json!({
        "message": "Login required",
        "action": "/login",
        "method": "POST",
        "fields": ["username", "password"]
    }))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cookie cleared, redirected to the login page")
    ),
    tag = "Authentication"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/login"),
    )
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Claims of the authenticated teacher", body = Claims),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(auth_user: AuthUser) -> Json<Claims> {
    Json(auth_user.0)
}
