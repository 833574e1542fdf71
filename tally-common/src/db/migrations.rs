//! Schema migrations
//!
//! Migrations run at startup, after table creation. Each one is
//! idempotent so a partially migrated database can be re-run safely.

use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Schema version this build expects
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Current version recorded in the database, 0 when untracked
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists = sqlx::query_scalar::<_, i32>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    if !table_exists {
        return Ok(0);
    }

    let version = sqlx::query_scalar::<_, Option<i32>>("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Apply any migrations newer than the recorded version
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version >= CURRENT_SCHEMA_VERSION {
        debug!("Database schema up to date (version {})", current_version);
        return Ok(());
    }

    info!(
        "Migrating database from version {} to {}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("Applied migration v1");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("Applied migration v2");
    }

    Ok(())
}

/// v1: audit trail. Databases created before auditing shipped lack the table.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
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

/// v2: room captain tracking on session metrics
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    let column_exists = sqlx::query_scalar::<_, i32>(
        "SELECT COUNT(*) FROM pragma_table_info('session_metrics') WHERE name = 'room_captain_id'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    if !column_exists {
        sqlx::query("ALTER TABLE session_metrics ADD COLUMN room_captain_id TEXT REFERENCES people(id)")
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn raw_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn version_is_zero_without_tracking_table() {
        let pool = raw_pool().await;
        assert_eq!(get_schema_version(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn fresh_database_is_current() {
        let pool = crate::db::init_memory_database().await.unwrap();
        assert_eq!(
            get_schema_version(&pool).await.unwrap(),
            CURRENT_SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = crate::db::init_memory_database().await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert_eq!(
            get_schema_version(&pool).await.unwrap(),
            CURRENT_SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn v2_adds_room_captain_column_to_legacy_table() {
        let pool = raw_pool().await;

        // Legacy layout: metrics without room captain tracking
        sqlx::query(
            r#"
            CREATE TABLE session_metrics (
                session_id TEXT PRIMARY KEY,
                guests_count INTEGER NOT NULL,
                registrations_count INTEGER NOT NULL,
                submitted_by TEXT NOT NULL,
                submitted_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        migrate_v2(&pool).await.unwrap();

        let column_exists: i32 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('session_metrics') WHERE name = 'room_captain_id'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(column_exists, 1);

        // Safe to run again
        migrate_v2(&pool).await.unwrap();
    }
}
