//! # Rollbook Models
//!
//! Domain models and payloads for the Rollbook API.
//!
//! Each entity implements [`rollbook_core::Resource`], which is all the
//! generic controller and the stores need to manage it.
//!
//! # Modules
//!
//! - [`teachers`]: Teacher records
//! - [`students`]: Student records, optionally owned by a teacher
//! - [`attendance`]: Attendance entries for students
//! - [`auth`]: Login request/response
//! - [`imports`]: Bulk import rows and the per-run report

pub mod attendance;
pub mod auth;
pub mod imports;
pub mod students;
pub mod teachers;

// Re-export commonly used types at crate root for convenience
pub use attendance::{Attendance, AttendancePayload, AttendanceStatus};
pub use auth::{LoginRequest, LoginResponse};
pub use imports::{ImportReport, ImportRequest, OutcomeStatus, RecordOutcome, StudentRow, TeacherRow};
pub use students::{Student, StudentPayload};
pub use teachers::{Teacher, TeacherPayload};
