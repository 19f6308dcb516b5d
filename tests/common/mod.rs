#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use rollbook::router::init_router;
use rollbook::state::{AppState, Stores};
use rollbook_auth::create_access_token;
use rollbook_config::{CorsConfig, ImportConfig, JwtConfig, ServerConfig};
use rollbook_core::{CrudController, RecordStore, Resource};
use rollbook_db::MemoryStore;
use rollbook_models::{Attendance, Student, StudentPayload, Teacher, TeacherPayload};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key";

pub struct TestApp {
    pub router: Router,
    pub jwt_config: JwtConfig,
    pub teachers: Arc<MemoryStore<Teacher>>,
    pub students: Arc<MemoryStore<Student>>,
    pub attendance: Arc<MemoryStore<Attendance>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup() -> TestApp {
    setup_with(ServerConfig::default())
}

pub fn setup_with(server_config: ServerConfig) -> TestApp {
    let teachers = Arc::new(MemoryStore::<Teacher>::new());
    let students = Arc::new(MemoryStore::<Student>::new());
    let attendance = Arc::new(MemoryStore::<Attendance>::new());
    let stores = Stores::memory(teachers.clone(), students.clone(), attendance.clone());

    let state = AppState {
        teachers: CrudController::new(stores.teachers),
        students: CrudController::new(stores.students),
        attendance: CrudController::new(stores.attendance),
        credentials: stores.credentials,
        jwt_config: jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        server_config,
        import_config: ImportConfig::default(),
    };

    TestApp {
        router: init_router(state),
        jwt_config: jwt_config(),
        teachers,
        students,
        attendance,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(authed("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(authed("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(authed("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(authed("DELETE", uri, token, None)).await
    }

    /// Stores a teacher directly, bypassing the API.
    pub async fn seed_teacher(&self, username: &str, password: &str) -> Teacher {
        let teacher = Teacher::from_payload(
            Uuid::new_v4(),
            TeacherPayload {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
                name: Some(format!("Teacher {username}")),
                ..TeacherPayload::default()
            },
        )
        .unwrap();
        self.teachers.save(teacher).await.unwrap()
    }

    pub async fn seed_student(&self, username: &str, enrollment_no: &str) -> Student {
        let student = Student::from_payload(
            Uuid::new_v4(),
            StudentPayload {
                username: Some(username.to_string()),
                password: Some("studentpass123".to_string()),
                name: Some(format!("Student {username}")),
                enrollment_no: Some(enrollment_no.to_string()),
                ..StudentPayload::default()
            },
        )
        .unwrap();
        self.students.save(student).await.unwrap()
    }

    /// A valid bearer token for a freshly seeded teacher.
    pub async fn login_token(&self) -> String {
        let teacher = self
            .seed_teacher(&format!("t-{}", &Uuid::new_v4().simple().to_string()[..8]), "password123")
            .await;
        create_access_token(teacher.id, &teacher.username, &self.jwt_config).unwrap()
    }

    /// Store operations served so far, across all kinds.
    pub fn store_calls(&self) -> usize {
        self.teachers.calls() + self.students.calls() + self.attendance.calls()
    }
}

pub fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn anonymous(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
