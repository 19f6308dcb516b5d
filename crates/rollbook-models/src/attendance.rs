//! Attendance entries: one student, one date, one status.

use chrono::NaiveDate;
use rollbook_core::{AppError, Resource};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, Validate)]
pub struct Attendance {
    pub id: Uuid,
    #[validate(required(message = "student_id is required"))]
    pub student_id: Option<Uuid>,
    #[validate(required(message = "date is required"))]
    pub date: Option<NaiveDate>,
    #[validate(required(message = "status is required"))]
    pub status: Option<AttendanceStatus>,
}

/// Body of `POST /api/attendance` and `PUT|PATCH /api/attendance/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct AttendancePayload {
    pub student_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl Resource for Attendance {
    type Payload = AttendancePayload;
    const KIND: &'static str = "Attendance";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_payload(id: Uuid, payload: AttendancePayload) -> Result<Self, AppError> {
        Ok(Attendance {
            id,
            student_id: payload.student_id,
            date: payload.date,
            status: payload.status,
        })
    }

    fn apply(&mut self, payload: AttendancePayload) -> Result<(), AppError> {
        if payload.student_id.is_some() {
            self.student_id = payload.student_id;
        }
        if payload.date.is_some() {
            self.date = payload.date;
        }
        if payload.status.is_some() {
            self.status = payload.status;
        }
        Ok(())
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        self.student_id.map(|id| ("student_id", id)).into_iter().collect()
    }
}
