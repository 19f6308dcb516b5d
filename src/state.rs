use std::sync::Arc;

use rollbook_config::{CorsConfig, ImportConfig, JwtConfig, ServerConfig, StoreBackend};
use rollbook_core::{CrudController, RecordStore};
use rollbook_db::{
    CredentialStore, MemoryStore, PgPool, PgStore, init_db_pool, link, run_migrations,
};
use rollbook_models::{Attendance, Student, Teacher};
use tracing::info;

/// One store per entity kind, plus the teacher lookup used at login.
#[derive(Clone)]
pub struct Stores {
    pub teachers: Arc<dyn RecordStore<Teacher>>,
    pub students: Arc<dyn RecordStore<Student>>,
    pub attendance: Arc<dyn RecordStore<Attendance>>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            teachers: store.clone(),
            students: store.clone(),
            attendance: store.clone(),
            credentials: store,
        }
    }

    /// Wires the memory stores with the same references the schema declares:
    /// `students.teacher_id` and `attendance.student_id`.
    pub fn memory(
        teachers: Arc<MemoryStore<Teacher>>,
        students: Arc<MemoryStore<Student>>,
        attendance: Arc<MemoryStore<Attendance>>,
    ) -> Self {
        link(&teachers, "teacher_id", &students);
        link(&students, "student_id", &attendance);

        Self {
            teachers: teachers.clone(),
            students,
            attendance,
            credentials: teachers,
        }
    }

    pub fn in_memory() -> Self {
        Self::memory(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    pub teachers: CrudController<Teacher>,
    pub students: CrudController<Student>,
    pub attendance: CrudController<Attendance>,
    pub credentials: Arc<dyn CredentialStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub import_config: ImportConfig,
}

impl AppState {
    /// Builds the state over `stores`, reading every other setting from the
    /// environment.
    pub fn new(stores: Stores, server_config: ServerConfig) -> Self {
        Self {
            teachers: CrudController::new(stores.teachers),
            students: CrudController::new(stores.students),
            attendance: CrudController::new(stores.attendance),
            credentials: stores.credentials,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            server_config,
            import_config: ImportConfig::from_env(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("server_config", &self.server_config)
            .field("import_config", &self.import_config)
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state(server_config: ServerConfig) -> anyhow::Result<AppState> {
    let stores = match server_config.store_backend {
        StoreBackend::Postgres => {
            let pool = init_db_pool().await?;
            run_migrations(&pool).await?;
            info!("Connected to PostgreSQL, migrations applied");
            Stores::postgres(pool)
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; records are lost on restart");
            Stores::in_memory()
        }
    };

    Ok(AppState::new(stores, server_config))
}
