//! # Schema Migrations
//!
//! The schema ships inside the binaries: `migrations/sqlite/*.sql` is
//! embedded at compile time and applied by `Database::new`.
//!
//! ```text
//! 001_initial_schema.sql
//!   restaurants ──< menu_items        (catalog, FK on restaurant_id)
//!   addresses                         (per user, one default)
//!   profiles                          (keyed by user id)
//!   orders                            (items as JSON, CHECKs on money/status)
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations`; a file that changed
//! after being applied makes startup fail, so schema changes go in a new
//! numbered file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database's schema is behind the embedded migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub available: usize,
    pub applied: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.available.saturating_sub(self.applied)
    }

    pub fn is_current(&self) -> bool {
        self.pending() == 0
    }
}

/// Applies every embedded migration the database hasn't recorded yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(
        applied = before.pending(),
        total = before.available,
        "Schema migrated"
    );
    Ok(())
}

/// Compares the embedded migrations with the ones recorded in the database.
///
/// A database that was never migrated has no `_sqlx_migrations` table and
/// reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let available = MIGRATOR.iter().count();

    let has_table: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if has_table {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok(MigrationStatus {
        available,
        applied: usize::try_from(applied).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_database_reports_pending() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(status.pending() >= 1);
        assert!(!status.is_current());

        db.run_migrations().await.unwrap();
        assert!(migration_status(db.pool()).await.unwrap().is_current());
    }

    #[tokio::test]
    async fn test_rerunning_is_a_no_op() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let status = migration_status(db.pool()).await.unwrap();

        db.run_migrations().await.unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap(), status);
    }

    #[tokio::test]
    async fn test_schema_has_every_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec!["addresses", "menu_items", "orders", "profiles", "restaurants"]
        );
    }
}
