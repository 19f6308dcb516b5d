use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use rollbook_cli::import::{ImportOptions, Reconciler};
use rollbook_config::ImportConfig;
use rollbook_core::{CreateOutcome, CrudController};
use rollbook_db::{PgPool, PgStore, init_db_pool, run_migrations};
use rollbook_models::{StudentRow, Teacher, TeacherPayload, TeacherRow};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Administrative tools for Rollbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a teacher account
    CreateTeacher {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Subject taught
        #[arg(short = 's', long)]
        subject: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Import teachers and link students to them from JSON files
    Import {
        /// JSON array of teacher rows
        #[arg(short = 't', long)]
        teachers: PathBuf,

        /// JSON array of student rows
        #[arg(short = 's', long)]
        students: Option<PathBuf>,

        /// Save teachers only, do not link students
        #[arg(long)]
        no_link: bool,

        /// Students linked to each new teacher
        #[arg(long)]
        max_per_teacher: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::CreateTeacher {
            username,
            name,
            email,
            subject,
            password,
        } => handle_create_teacher(&pool, username, name, email, subject, password).await,
        Commands::Import {
            teachers,
            students,
            no_link,
            max_per_teacher,
        } => handle_import(&pool, &teachers, students.as_deref(), no_link, max_per_teacher).await,
    }
}

async fn handle_migrate(pool: &PgPool) {
    match run_migrations(pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("\n❌ Error running migrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_create_teacher(
    pool: &PgPool,
    username: Option<String>,
    name: Option<String>,
    email: Option<String>,
    subject: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| prompt("Username"));
    let name = name.unwrap_or_else(|| prompt("Name"));

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    let payload = TeacherPayload {
        username: Some(username),
        password: Some(password),
        name: Some(name),
        email,
        subject,
    };

    let teachers: CrudController<Teacher> = CrudController::new(Arc::new(PgStore::new(pool.clone())));
    match teachers.create(payload).await {
        Ok(CreateOutcome::Created(teacher)) => {
            println!("\n✅ Teacher created successfully!");
            println!("   Username: {}", teacher.username);
            println!("   Name: {}", teacher.name);
        }
        Ok(CreateOutcome::Rejected(message)) => {
            eprintln!("\n❌ Teacher not created: {}", message);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating teacher: {}", e.error);
            for detail in &e.details {
                eprintln!("   {}: {}", detail.field, detail.message);
            }
            std::process::exit(1);
        }
    }
}

async fn handle_import(
    pool: &PgPool,
    teachers_path: &Path,
    students_path: Option<&Path>,
    no_link: bool,
    max_per_teacher: Option<usize>,
) {
    let teacher_rows: Vec<TeacherRow> = read_rows(teachers_path);
    let student_rows: Vec<StudentRow> = students_path.map(read_rows).unwrap_or_default();

    let mut options = ImportOptions::from(ImportConfig::from_env());
    if no_link {
        options.link_students = false;
    }
    if let Some(max) = max_per_teacher {
        options.max_students_per_teacher = max;
    }

    let store = Arc::new(PgStore::new(pool.clone()));
    let reconciler = Reconciler::new(store.clone(), store, options);

    match reconciler.run(teacher_rows, student_rows).await {
        Ok(report) => {
            println!(
                "✅ Teachers: {} saved, {} skipped, {} failed",
                report.teachers_saved, report.teachers_skipped, report.teachers_failed
            );
            println!(
                "✅ Students: {} saved, {} failed",
                report.students_saved, report.students_failed
            );
            for outcome in report.outcomes.iter().filter(|o| o.message.is_some()) {
                println!(
                    "   {} {} {}: {}",
                    outcome.kind,
                    outcome.label,
                    outcome.status.as_str(),
                    outcome.message.as_deref().unwrap_or_default()
                );
            }
        }
        Err(e) => {
            eprintln!("\n❌ Import failed: {}", e.error);
            std::process::exit(1);
        }
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Failed to read {}", path.display()), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| fail(&format!("Failed to parse {}", path.display()), e))
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| fail(&format!("Failed to read {}", label.to_lowercase()), e))
}

fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}: {}", context, error);
    std::process::exit(1);
}
