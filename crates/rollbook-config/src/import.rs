use crate::env_or;

/// Defaults for bulk import runs; a request may override either field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    /// Whether imported students are linked to imported teachers at all.
    pub link_students: bool,
    /// Upper bound on students linked to each newly imported teacher.
    pub max_students_per_teacher: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            link_students: true,
            max_students_per_teacher: 3,
        }
    }
}

impl ImportConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            link_students: env_or("IMPORT_LINK_STUDENTS", defaults.link_students),
            max_students_per_teacher: env_or(
                "IMPORT_MAX_STUDENTS_PER_TEACHER",
                defaults.max_students_per_teacher,
            ),
        }
    }
}
