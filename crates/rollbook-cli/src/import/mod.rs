//! Bulk import/link process.
//!
//! Teachers are saved first; each teacher that was newly saved then gets up
//! to `max_students_per_teacher` students linked to it. Student identifiers
//! in the incoming rows are discarded and replaced by run-allocated ones, so
//! every linked student is a new record. Failures are recorded per row and
//! never abort the run; nothing is rolled back.

mod allocator;

use std::sync::Arc;

use metrics::counter;
use rollbook_config::ImportConfig;
use rollbook_core::{AppError, RecordStore, Resource, StoreError, hash_password, validation};
use rollbook_models::{
    ImportReport, OutcomeStatus, RecordOutcome, Student, StudentRow, Teacher, TeacherPayload,
    TeacherRow,
};
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub use allocator::{Allocation, EnrollmentAllocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub link_students: bool,
    pub max_students_per_teacher: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportConfig::default().into()
    }
}

impl From<ImportConfig> for ImportOptions {
    fn from(config: ImportConfig) -> Self {
        Self {
            link_students: config.link_students,
            max_students_per_teacher: config.max_students_per_teacher,
        }
    }
}

/// A student row with its password already hashed. Shared read-only by
/// every teacher task.
#[derive(Debug, Clone)]
struct PreparedStudent {
    name: String,
    password_hash: String,
    roll: Option<i32>,
}

pub struct Reconciler {
    teachers: Arc<dyn RecordStore<Teacher>>,
    students: Arc<dyn RecordStore<Student>>,
    options: ImportOptions,
}

impl Reconciler {
    pub fn new(
        teachers: Arc<dyn RecordStore<Teacher>>,
        students: Arc<dyn RecordStore<Student>>,
        options: ImportOptions,
    ) -> Self {
        Self {
            teachers,
            students,
            options,
        }
    }

    pub fn options(&self) -> ImportOptions {
        self.options
    }

    /// Runs one import and waits for every teacher task to finish.
    ///
    /// Only a failure to hash the shared student passwords aborts the run.
    #[instrument(skip_all, fields(teachers = teacher_rows.len(), students = student_rows.len()))]
    pub async fn run(
        &self,
        teacher_rows: Vec<TeacherRow>,
        student_rows: Vec<StudentRow>,
    ) -> Result<ImportReport, AppError> {
        let prepared = if self.options.link_students {
            prepare_students(student_rows, self.options.max_students_per_teacher)?
        } else {
            Vec::new()
        };
        let prepared = Arc::new(prepared);
        let allocator = Arc::new(EnrollmentAllocator::new());

        let mut tasks = JoinSet::new();
        for (index, row) in teacher_rows.into_iter().enumerate() {
            let task = TeacherTask {
                teachers: Arc::clone(&self.teachers),
                students: Arc::clone(&self.students),
                students_to_link: Arc::clone(&prepared),
                allocator: Arc::clone(&allocator),
                link: self.options.link_students,
            };
            tasks.spawn(task.run(index, row));
        }

        let mut report = ImportReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(partial) => report.merge(partial),
                Err(e) => {
                    error!(error = %e, "Import task did not complete");
                    report.record(outcome(
                        Teacher::KIND,
                        "unknown".to_string(),
                        OutcomeStatus::Failed,
                        Some(e.to_string()),
                    ));
                }
            }
        }

        info!(
            run = allocator.tag(),
            teachers_saved = report.teachers_saved,
            teachers_skipped = report.teachers_skipped,
            teachers_failed = report.teachers_failed,
            students_saved = report.students_saved,
            students_failed = report.students_failed,
            "Import finished"
        );

        Ok(report)
    }
}

fn prepare_students(
    rows: Vec<StudentRow>,
    limit: usize,
) -> Result<Vec<PreparedStudent>, AppError> {
    rows.into_iter()
        .take(limit)
        .map(|row| {
            let password_hash = match row.password.as_deref() {
                Some(password) if !password.is_empty() => hash_password(password)?,
                _ => String::new(),
            };
            Ok(PreparedStudent {
                name: row
                    .name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Student".to_string()),
                password_hash,
                roll: row.roll,
            })
        })
        .collect()
}

struct TeacherTask {
    teachers: Arc<dyn RecordStore<Teacher>>,
    students: Arc<dyn RecordStore<Student>>,
    students_to_link: Arc<Vec<PreparedStudent>>,
    allocator: Arc<EnrollmentAllocator>,
    link: bool,
}

impl TeacherTask {
    async fn run(self, index: usize, row: TeacherRow) -> ImportReport {
        let mut report = ImportReport::default();
        let label = row
            .username
            .clone()
            .unwrap_or_else(|| format!("teacher row {}", index + 1));

        let teacher = match self.save_teacher(row).await {
            Ok(teacher) => {
                report.record(outcome(Teacher::KIND, label, OutcomeStatus::Saved, None));
                teacher
            }
            Err((status, message)) => {
                warn!(teacher = %label, %message, "Teacher not imported");
                report.record(outcome(Teacher::KIND, label, status, Some(message)));
                return report;
            }
        };

        if !self.link {
            return report;
        }

        for prepared in self.students_to_link.iter() {
            let allocation = self.allocator.next();
            let student = linked_student(prepared, &allocation, teacher.id);
            let label = student.username.clone();

            let failure = match validation::check(&student).as_slice() {
                [] => self.students.save(student).await.err().map(|e| e.to_string()),
                errors => Some(joined_messages(errors)),
            };

            match failure {
                None => report.record(outcome(Student::KIND, label, OutcomeStatus::Saved, None)),
                Some(message) => {
                    warn!(student = %label, teacher = %teacher.username, %message, "Student not imported");
                    report.record(outcome(
                        Student::KIND,
                        label,
                        OutcomeStatus::Failed,
                        Some(message),
                    ));
                }
            }
        }

        report
    }

    async fn save_teacher(&self, row: TeacherRow) -> Result<Teacher, (OutcomeStatus, String)> {
        let payload = TeacherPayload {
            username: row.username,
            password: row.password,
            name: row.name,
            email: row.email,
            subject: row.subject,
        };

        let errors = validation::check(&payload);
        if !errors.is_empty() {
            return Err((OutcomeStatus::Failed, joined_messages(&errors)));
        }

        let candidate = Teacher::from_payload(Uuid::new_v4(), payload)
            .map_err(|e| (OutcomeStatus::Failed, e.error.to_string()))?;
        let errors = validation::check(&candidate);
        if !errors.is_empty() {
            return Err((OutcomeStatus::Failed, joined_messages(&errors)));
        }

        self.teachers.save(candidate).await.map_err(|e| match e {
            StoreError::Conflict { message, .. } => (OutcomeStatus::Skipped, message),
            other => (OutcomeStatus::Failed, other.to_string()),
        })
    }
}

fn linked_student(prepared: &PreparedStudent, allocation: &Allocation, teacher_id: Uuid) -> Student {
    Student {
        id: Uuid::new_v4(),
        username: format!("s-{}", allocation.enrollment_no.to_lowercase()),
        password: prepared.password_hash.clone(),
        name: format!("{}-{}", prepared.name, allocation.seq),
        enrollment_no: allocation.enrollment_no.clone(),
        roll: prepared.roll,
        teacher_id: Some(teacher_id),
    }
}

fn outcome(
    kind: &str,
    label: String,
    status: OutcomeStatus,
    message: Option<String>,
) -> RecordOutcome {
    counter!("import_records_total", "kind" => kind.to_string(), "outcome" => status.as_str())
        .increment(1);
    RecordOutcome {
        kind: kind.to_string(),
        label,
        status,
        message,
    }
}

fn joined_messages(errors: &[validation::FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
