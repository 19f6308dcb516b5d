pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod imports;
pub mod students;
pub mod teachers;
