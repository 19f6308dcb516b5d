//! Teacher records.
//!
//! `username` is unique across teachers and is the login name.

use rollbook_core::{AppError, Resource, hash_password};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, Validate)]
pub struct Teacher {
    pub id: Uuid,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// bcrypt hash
    #[serde(skip)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub email: Option<String>,
    pub subject: Option<String>,
}

/// Body of `POST /api/teachers` and `PUT|PATCH /api/teachers/{id}`.
///
/// On update only the fields present are changed.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct TeacherPayload {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
}

impl Resource for Teacher {
    type Payload = TeacherPayload;
    const KIND: &'static str = "Teacher";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_payload(id: Uuid, payload: TeacherPayload) -> Result<Self, AppError> {
        let password = match payload.password {
            Some(password) => hash_password(&password)?,
            None => String::new(),
        };

        Ok(Teacher {
            id,
            username: payload.username.unwrap_or_default().trim().to_string(),
            password,
            name: payload.name.unwrap_or_default().trim().to_string(),
            email: payload.email,
            subject: payload.subject,
        })
    }

    fn apply(&mut self, payload: TeacherPayload) -> Result<(), AppError> {
        if let Some(username) = payload.username {
            self.username = username.trim().to_string();
        }
        if let Some(password) = payload.password {
            self.password = hash_password(&password)?;
        }
        if let Some(name) = payload.name {
            self.name = name.trim().to_string();
        }
        if payload.email.is_some() {
            self.email = payload.email;
        }
        if payload.subject.is_some() {
            self.subject = payload.subject;
        }
        Ok(())
    }

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![("username", self.username.clone())]
    }
}
