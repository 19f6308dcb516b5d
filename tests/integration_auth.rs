mod common;

use axum::http::{StatusCode, header};
use chrono::Utc;
use common::{TEST_SECRET, anonymous, setup};
use jsonwebtoken::{EncodingKey, Header, encode};
use rollbook_auth::{Claims, create_access_token};
use rollbook_config::JwtConfig;
use serde_json::json;

fn expired_token(sub: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: sub.to_string(),
        username: "ghost".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_missing_credential_is_401_without_store_access() {
    let app = setup();

    let response = app.send(anonymous("GET", "/api/students", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Missing authorization token");
    assert_eq!(app.store_calls(), 0);
}

#[tokio::test]
async fn test_expired_credential_is_401_without_store_access() {
    let app = setup();
    let token = expired_token(&uuid::Uuid::new_v4().to_string());

    let response = app.get("/api/teachers", &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid or expired token");
    assert_eq!(app.store_calls(), 0);
}

#[tokio::test]
async fn test_tampered_credential_is_401_without_store_access() {
    let app = setup();
    let id = uuid::Uuid::new_v4();

    let foreign = JwtConfig {
        secret: "some-other-secret".to_string(),
        access_token_expiry: 3600,
    };
    let wrong_key = create_access_token(id, "mallory", &foreign).unwrap();

    let genuine = create_access_token(id, "alice", &app.jwt_config).unwrap();
    let forged_claims = create_access_token(id, "admin", &foreign).unwrap();
    let parts: Vec<&str> = genuine.split('.').collect();
    let forged_parts: Vec<&str> = forged_claims.split('.').collect();
    let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

    for token in [wrong_key, spliced, "not-a-jwt".to_string()] {
        let response = app
            .post(
                "/api/students",
                &token,
                json!({ "username": "x", "name": "x", "enrollment_no": "x" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(app.store_calls(), 0);
}

#[tokio::test]
async fn test_valid_credential_attaches_identity() {
    let app = setup();
    let teacher = app.seed_teacher("jdoe", "password123").await;
    let token = create_access_token(teacher.id, "jdoe", &app.jwt_config).unwrap();

    let response = app.get("/api/me", &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sub"], teacher.id.to_string());
    assert_eq!(response.body["username"], "jdoe");
}

#[tokio::test]
async fn test_login_issues_token_and_cookie() {
    let app = setup();
    app.seed_teacher("jdoe", "password123").await;

    let response = app
        .send(anonymous(
            "POST",
            "/login",
            Some(json!({ "username": "jdoe", "password": "password123" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "Bearer");
    assert_eq!(response.body["expires_in"], 3600);
    assert_eq!(response.body["teacher"]["username"], "jdoe");
    assert!(response.body["teacher"].get("password").is_none());

    let token = response.body["access_token"].as_str().unwrap();
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("token={token}")));
    assert!(cookie.contains("HttpOnly"));

    let me = app.get("/api/me", token).await;
    assert_eq!(me.body["username"], "jdoe");
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = setup();
    let token = app.login_token().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/dashboard")
        .header(header::COOKIE, format!("token={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["teachers"], 1);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = setup();
    app.seed_teacher("jdoe", "password123").await;

    for (username, password) in [("jdoe", "wrong-password"), ("nobody", "password123")] {
        let response = app
            .send(anonymous(
                "POST",
                "/login",
                Some(json!({ "username": username, "password": password })),
            ))
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = setup();

    let response = app
        .send(anonymous(
            "POST",
            "/login",
            Some(json!({ "username": "", "password": "" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_login_form_redirects_when_logged_in() {
    let app = setup();
    let token = app.login_token().await;

    let logged_in = app.get("/login", &token).await;
    assert_eq!(logged_in.status, StatusCode::SEE_OTHER);
    assert_eq!(logged_in.headers[header::LOCATION], "/api/dashboard");

    let anonymous_form = app.send(anonymous("GET", "/login", None)).await;
    assert_eq!(anonymous_form.status, StatusCode::OK);
    assert_eq!(anonymous_form.body["action"], "/login");

    let stale = app.get("/login", &expired_token("x")).await;
    assert_eq!(stale.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = setup();
    let token = app.login_token().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/logout")
        .header(header::COOKIE, format!("token={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.headers[header::LOCATION], "/login");
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}
