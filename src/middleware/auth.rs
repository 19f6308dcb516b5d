//! The authentication gate.
//!
//! Protected routes sit behind [`require_auth`], which resolves the bearer
//! credential and attaches the caller's identity before any handler runs.
//! The credential is read from `Authorization: Bearer <token>` first and the
//! `token` session cookie second.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use metrics::counter;
use rollbook_auth::{Claims, verify_token};
use rollbook_core::AppError;
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "token";

/// Where a caller who already holds a valid credential is sent.
pub const LOGGED_IN_REDIRECT: &str = "/api/dashboard";

/// Identity attached to a request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn teacher_id(&self) -> Result<Uuid, AppError> {
        self.0
            .teacher_id()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid teacher ID in token")))
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Authentication required")))
    }
}

/// The credential carried by a request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .or_else(|| {
            CookieJar::from_headers(headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
        })
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(req.headers()).ok_or_else(|| {
        counter!("auth_rejections_total", "reason" => "missing").increment(1);
        AppError::unauthorized(anyhow!("Missing authorization token"))
    })?;

    let claims = verify_token(&token, &state.jwt_config).inspect_err(|_| {
        counter!("auth_rejections_total", "reason" => "invalid").increment(1);
    })?;

    debug!(teacher = %claims.username, "Request authenticated");
    req.extensions_mut().insert(AuthUser(claims));

    Ok(next.run(req).await)
}

/// Sends callers that are already logged in to the dashboard; everyone else
/// passes through untouched.
pub async fn redirect_if_logged_in(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let logged_in = session_token(req.headers())
        .is_some_and(|token| verify_token(&token, &state.jwt_config).is_ok());

    if logged_in {
        return Redirect::to(LOGGED_IN_REDIRECT).into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=from-cookie"));

        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_cookie_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=abc"));

        assert_eq!(session_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_no_credential() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(session_token(&headers).is_none());
    }
}
