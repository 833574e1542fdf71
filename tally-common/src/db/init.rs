//! Database initialization
//!
//! Creates the database file on first use, applies the schema, and runs
//! pending migrations.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (or create) the database at `db_path` and bring it up to date
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Created new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Foreign keys are OFF by default in SQLite
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL lets readers proceed while an approval transaction writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Wait up to 5s on a locked database instead of failing immediately
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    super::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema, for tests.
///
/// Limited to a single connection: every pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    create_schema(&pool).await?;
    super::migrations::run_migrations(&pool).await?;

    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_people_table(pool).await?;
    create_sessions_table(pool).await?;
    create_participations_table(pool).await?;
    create_session_metrics_table(pool).await?;
    create_criteria_table(pool).await?;
    create_pending_submissions_table(pool).await?;
    create_audit_log_table(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_people_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            region TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('leader', 'staff', 'admin')),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_people_region ON people(region)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            location TEXT NOT NULL,
            notes TEXT,
            created_by TEXT NOT NULL REFERENCES people(id),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_participations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participations (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            person_id TEXT NOT NULL REFERENCES people(id),
            role TEXT NOT NULL CHECK (role IN ('LEADER', 'REGISTRATION_EXPERT', 'ROOM_CAPTAIN')),
            UNIQUE (session_id, person_id, role)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_participations_person_role ON participations(person_id, role)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_session_metrics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session_metrics (
            session_id TEXT PRIMARY KEY REFERENCES sessions(id) ON DELETE CASCADE,
            guests_count INTEGER NOT NULL CHECK (guests_count >= 0),
            registrations_count INTEGER NOT NULL CHECK (registrations_count >= 0),
            room_captain_id TEXT REFERENCES people(id),
            submitted_by TEXT NOT NULL REFERENCES people(id),
            submitted_at TEXT NOT NULL,
            CHECK (registrations_count <= guests_count)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_criteria_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS criteria (
            id TEXT PRIMARY KEY,
            person_id TEXT REFERENCES people(id),
            guests_target INTEGER CHECK (guests_target IS NULL OR guests_target >= 0),
            registrations_target INTEGER CHECK (registrations_target IS NULL OR registrations_target >= 0),
            effectiveness_target_pct REAL CHECK (
                effectiveness_target_pct IS NULL
                OR (effectiveness_target_pct >= 0.0 AND effectiveness_target_pct <= 100.0)
            ),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_criteria_person ON criteria(person_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_pending_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pending_submissions (
            id TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            submitted_by TEXT NOT NULL REFERENCES people(id),
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected')),
            submitted_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pending_submissions_status ON pending_submissions(status)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_audit_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id TEXT PRIMARY KEY,
            actor_id TEXT,
            action TEXT NOT NULL,
            payload TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_log_created_at ON audit_log(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
