//! PostgreSQL-backed record store.
//!
//! Saves are single-statement upserts keyed on `id`, so a constraint
//! violation leaves the row untouched.

use async_trait::async_trait;
use rollbook_core::{RecordStore, StoreError};
use rollbook_models::{Attendance, Student, Teacher};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::{missing_reference, unique_conflict};

const TEACHER_COLUMNS: &str = "id, username, password, name, email, subject";
const STUDENT_COLUMNS: &str = "id, username, password, name, enrollment_no, roll, teacher_id";
const ATTENDANCE_COLUMNS: &str = "id, student_id, date, status";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a driver error onto the store taxonomy.
///
/// Unique violations name the offending column, recovered from the
/// `<table>_<column>_key` constraint naming used by the migrations.
pub(crate) fn map_sqlx_error(kind: &'static str, table: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .map(|c| constraint_column(table, c))
                .unwrap_or_else(|| "value".to_string());
            return unique_conflict(kind, &field);
        }
        if db_err.is_foreign_key_violation() {
            return missing_reference(kind);
        }
    }
    StoreError::Backend(Box::new(err))
}

fn constraint_column(table: &str, constraint: &str) -> String {
    constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix("_key"))
        .unwrap_or(constraint)
        .to_string()
}

async fn delete_by_id(
    pool: &PgPool,
    kind: &'static str,
    table: &str,
    id: Uuid,
) -> Result<(), StoreError> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error(kind, table, e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound { kind, key: id });
    }
    Ok(())
}

async fn count_rows(pool: &PgPool, kind: &'static str, table: &str) -> Result<usize, StoreError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error(kind, table, e))?;
    Ok(count.max(0) as usize)
}

#[async_trait]
impl RecordStore<Teacher> for PgStore {
    async fn find_all(&self) -> Result<Vec<Teacher>, StoreError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Teacher", "teachers", e))
    }

    async fn find_one(&self, id: Uuid) -> Result<Teacher, StoreError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Teacher", "teachers", e))?
        .ok_or(StoreError::NotFound {
            kind: "Teacher",
            key: id,
        })
    }

    #[instrument(skip(self, record), fields(id = %record.id), err)]
    async fn save(&self, record: Teacher) -> Result<Teacher, StoreError> {
        sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers ({TEACHER_COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (id) DO UPDATE SET
                   username = EXCLUDED.username,
                   password = EXCLUDED.password,
                   name = EXCLUDED.name,
                   email = EXCLUDED.email,
                   subject = EXCLUDED.subject,
                   updated_at = NOW()
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Teacher", "teachers", e))
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "Teacher", "teachers", id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        count_rows(&self.pool, "Teacher", "teachers").await
    }
}

#[async_trait]
impl RecordStore<Student> for PgStore {
    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Student", "students", e))
    }

    async fn find_one(&self, id: Uuid) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Student", "students", e))?
        .ok_or(StoreError::NotFound {
            kind: "Student",
            key: id,
        })
    }

    #[instrument(skip(self, record), fields(id = %record.id), err)]
    async fn save(&self, record: Student) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students ({STUDENT_COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (id) DO UPDATE SET
                   username = EXCLUDED.username,
                   password = EXCLUDED.password,
                   name = EXCLUDED.name,
                   enrollment_no = EXCLUDED.enrollment_no,
                   roll = EXCLUDED.roll,
                   teacher_id = EXCLUDED.teacher_id,
                   updated_at = NOW()
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.name)
        .bind(&record.enrollment_no)
        .bind(record.roll)
        .bind(record.teacher_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Student", "students", e))
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "Student", "students", id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        count_rows(&self.pool, "Student", "students").await
    }
}

#[async_trait]
impl RecordStore<Attendance> for PgStore {
    async fn find_all(&self) -> Result<Vec<Attendance>, StoreError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY date DESC, created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Attendance", "attendance", e))
    }

    async fn find_one(&self, id: Uuid) -> Result<Attendance, StoreError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Attendance", "attendance", e))?
        .ok_or(StoreError::NotFound {
            kind: "Attendance",
            key: id,
        })
    }

    #[instrument(skip(self, record), fields(id = %record.id), err)]
    async fn save(&self, record: Attendance) -> Result<Attendance, StoreError> {
        sqlx::query_as::<_, Attendance>(&format!(
            r#"INSERT INTO attendance ({ATTENDANCE_COLUMNS})
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO UPDATE SET
                   student_id = EXCLUDED.student_id,
                   date = EXCLUDED.date,
                   status = EXCLUDED.status
               RETURNING {ATTENDANCE_COLUMNS}"#
        ))
        .bind(record.id)
        .bind(record.student_id)
        .bind(record.date)
        .bind(record.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Attendance", "attendance", e))
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "Attendance", "attendance", id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        count_rows(&self.pool, "Attendance", "attendance").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_column() {
        assert_eq!(constraint_column("students", "students_enrollment_no_key"), "enrollment_no");
        assert_eq!(constraint_column("teachers", "teachers_username_key"), "username");
        assert_eq!(constraint_column("teachers", "custom_idx"), "custom_idx");
    }

    #[test]
    fn test_non_database_error_is_backend() {
        let err = map_sqlx_error("Teacher", "teachers", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
