//! # Rollbook CLI
//!
//! Administrative tooling for Rollbook. The library half holds the bulk
//! import/link process so the HTTP API and the binary share one
//! implementation.
//!
//! ## Usage
//!
//! ```ignore
//! use rollbook_cli::import::{ImportOptions, Reconciler};
//!
//! let reconciler = Reconciler::new(teachers, students, ImportOptions::default());
//! let report = reconciler.run(teacher_rows, student_rows).await?;
//! println!("{} teachers saved", report.teachers_saved);
//! ```

pub mod import;
