//! Bulk import rows and the per-run report.
//!
//! Rows arrive as loosely-typed JSON; every field is optional because the
//! reconciler validates the assembled record, not the row.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TeacherRow {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
}

/// A student row. Any `username` or `enrollment_no` it carries is ignored:
/// imported students get identifiers allocated for the run.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentRow {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub enrollment_no: Option<String>,
    pub roll: Option<i32>,
}

/// Body of `POST /api/import`. Omitted options fall back to the server's
/// import configuration.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ImportRequest {
    #[serde(default)]
    pub teachers: Vec<TeacherRow>,
    #[serde(default)]
    pub students: Vec<StudentRow>,
    pub link_students: Option<bool>,
    pub max_students_per_teacher: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Saved,
    /// The record already existed (unique conflict).
    Skipped,
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Saved => "saved",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordOutcome {
    /// `Teacher` or `Student`.
    pub kind: String,
    /// Username of the record, or the row position when it had none.
    pub label: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ImportReport {
    pub teachers_saved: usize,
    pub teachers_skipped: usize,
    pub teachers_failed: usize,
    pub students_saved: usize,
    pub students_failed: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl ImportReport {
    /// Appends an outcome and bumps the matching total.
    pub fn record(&mut self, outcome: RecordOutcome) {
        let teacher = outcome.kind == "Teacher";
        match (teacher, outcome.status) {
            (true, OutcomeStatus::Saved) => self.teachers_saved += 1,
            (true, OutcomeStatus::Skipped) => self.teachers_skipped += 1,
            (true, OutcomeStatus::Failed) => self.teachers_failed += 1,
            (false, OutcomeStatus::Saved) => self.students_saved += 1,
            (false, _) => self.students_failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn merge(&mut self, other: ImportReport) {
        for outcome in other.outcomes {
            self.record(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: &str, status: OutcomeStatus) -> RecordOutcome {
        RecordOutcome {
            kind: kind.to_string(),
            label: "row".to_string(),
            status,
            message: None,
        }
    }

    #[test]
    fn test_request_defaults() {
        let request: ImportRequest = serde_json::from_str("{}").unwrap();
        assert!(request.teachers.is_empty());
        assert!(request.students.is_empty());
        assert!(request.link_students.is_none());
    }

    #[test]
    fn test_report_totals() {
        let mut first = ImportReport::default();
        first.record(outcome("Teacher", OutcomeStatus::Saved));
        first.record(outcome("Student", OutcomeStatus::Saved));

        let mut second = ImportReport::default();
        second.record(outcome("Teacher", OutcomeStatus::Skipped));
        second.record(outcome("Student", OutcomeStatus::Failed));

        first.merge(second);

        assert_eq!(first.teachers_saved, 1);
        assert_eq!(first.teachers_skipped, 1);
        assert_eq!(first.students_saved, 1);
        assert_eq!(first.students_failed, 1);
        assert_eq!(first.outcomes.len(), 4);

        let json = serde_json::to_value(&first).unwrap();
        assert_eq!(json["outcomes"][2]["status"], "skipped");
        assert!(json["outcomes"][0].get("message").is_none());
    }
}
