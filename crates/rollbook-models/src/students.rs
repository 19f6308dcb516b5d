//! Student records.
//!
//! `username` and `enrollment_no` are each unique across students. A student
//! belongs to at most one teacher through `teacher_id`.

use std::borrow::Cow;

use rollbook_core::{AppError, Resource, hash_password};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, Validate)]
pub struct Student {
    pub id: Uuid,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// bcrypt hash
    #[serde(skip)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "enrollment_no is required"))]
    pub enrollment_no: String,
    pub roll: Option<i32>,
    pub teacher_id: Option<Uuid>,
}

/// Body of `POST /api/students` and `PUT|PATCH /api/students/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct StudentPayload {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_enrollment_no"))]
    pub enrollment_no: Option<String>,
    #[validate(range(min = 0, message = "roll must not be negative"))]
    pub roll: Option<i32>,
    pub teacher_id: Option<Uuid>,
}

/// Enrollment numbers are short codes of ASCII letters, digits and dashes.
fn validate_enrollment_no(value: &str) -> Result<(), ValidationError> {
    let well_formed = !value.is_empty()
        && value.len() <= 32
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("enrollment_no").with_message(Cow::Borrowed(
            "enrollment_no must be 1-32 letters, digits or dashes",
        )))
    }
}

impl Resource for Student {
    type Payload = StudentPayload;
    const KIND: &'static str = "Student";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_payload(id: Uuid, payload: StudentPayload) -> Result<Self, AppError> {
        let password = match payload.password {
            Some(password) => hash_password(&password)?,
            None => String::new(),
        };

        Ok(Student {
            id,
            username: payload.username.unwrap_or_default().trim().to_string(),
            password,
            name: payload.name.unwrap_or_default().trim().to_string(),
            enrollment_no: payload.enrollment_no.unwrap_or_default(),
            roll: payload.roll,
            teacher_id: payload.teacher_id,
        })
    }

    fn apply(&mut self, payload: StudentPayload) -> Result<(), AppError> {
        if let Some(username) = payload.username {
            self.username = username.trim().to_string();
        }
        if let Some(password) = payload.password {
            self.password = hash_password(&password)?;
        }
        if let Some(name) = payload.name {
            self.name = name.trim().to_string();
        }
        if let Some(enrollment_no) = payload.enrollment_no {
            self.enrollment_no = enrollment_no;
        }
        if payload.roll.is_some() {
            self.roll = payload.roll;
        }
        if payload.teacher_id.is_some() {
            self.teacher_id = payload.teacher_id;
        }
        Ok(())
    }

    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("username", self.username.clone()),
            ("enrollment_no", self.enrollment_no.clone()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        self.teacher_id.map(|id| ("teacher_id", id)).into_iter().collect()
    }

    fn release_reference(&mut self, column: &'static str) -> bool {
        if column == "teacher_id" {
            self.teacher_id = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> StudentPayload {
        StudentPayload {
            username: Some("student1".to_string()),
            password: Some("studentpass123".to_string()),
            name: Some("Sam Student".to_string()),
            enrollment_no: Some("2024-0001".to_string()),
            roll: Some(7),
            teacher_id: None,
        }
    }

    #[test]
    fn test_payload_validation() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_payload_bad_enrollment_no() {
        let invalid = StudentPayload {
            enrollment_no: Some("no spaces allowed".to_string()),
            ..payload()
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("enrollment_no"));
    }

    #[test]
    fn test_payload_negative_roll() {
        let invalid = StudentPayload {
            roll: Some(-1),
            ..payload()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_missing_enrollment_no_fails_record_validation() {
        let candidate = Student::from_payload(
            Uuid::new_v4(),
            StudentPayload {
                enrollment_no: None,
                ..payload()
            },
        )
        .unwrap();

        let errors = candidate.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("enrollment_no"));
    }

    #[test]
    fn test_unique_fields() {
        let student = Student::from_payload(Uuid::new_v4(), payload()).unwrap();
        assert_eq!(
            student.unique_fields(),
            vec![
                ("username", "student1".to_string()),
                ("enrollment_no", "2024-0001".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_reassigns_teacher() {
        let mut student = Student::from_payload(Uuid::new_v4(), payload()).unwrap();
        let teacher_id = Uuid::new_v4();

        student
            .apply(StudentPayload {
                teacher_id: Some(teacher_id),
                ..StudentPayload::default()
            })
            .unwrap();

        assert_eq!(student.teacher_id, Some(teacher_id));
        assert_eq!(student.enrollment_no, "2024-0001");
    }

    #[test]
    fn test_released_teacher_leaves_student_unassigned() {
        let teacher_id = Uuid::new_v4();
        let mut student = Student::from_payload(
            Uuid::new_v4(),
            StudentPayload {
                teacher_id: Some(teacher_id),
                ..payload()
            },
        )
        .unwrap();
        assert_eq!(student.references(), vec![("teacher_id", teacher_id)]);

        assert!(student.release_reference("teacher_id"));
        assert_eq!(student.teacher_id, None);
        assert!(student.references().is_empty());
    }
}
