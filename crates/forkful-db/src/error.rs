//! # Storage Errors
//!
//! Every repository call returns [`DbResult`]. The client turns a
//! [`DbError`] into a short message (`ApiError`) or, during checkout,
//! wraps it in a `CheckoutError` that says which step failed.
//!
//! ```text
//! sqlx::Error ──────────┐
//! MigrateError ─────────┼──► DbError ──► ApiError / CheckoutError
//! serde_json (items) ───┤
//! CoreError (rules) ────┘
//! ```

use forkful_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row for the given key, or the row belongs to another user.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A primary key or unique index already holds the value.
    /// `target` is SQLite's `table.column`.
    #[error("Duplicate {target}")]
    Duplicate { target: String },

    /// A row points at a parent that doesn't exist
    /// (a menu item for an unknown restaurant).
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// A CHECK or NOT NULL rule in the schema refused the row
    /// (negative money, unknown status).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The database can't be opened, or the handle was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin, commit or rollback of a transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A stored value could not be read back into a domain type
    /// (order items JSON, timestamps, statuses).
    #[error("Corrupt {field} value: {reason}")]
    Serialization { field: String, reason: String },

    /// A domain rule refused the write (e.g. an illegal status transition).
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// A stored column that no longer parses.
    pub fn corrupt(field: impl Into<String>, reason: impl ToString) -> Self {
        DbError::Serialization {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Sorts a failed statement by the schema rule it broke.
///
/// SQLite reports unique failures as `UNIQUE constraint failed: t.col`;
/// only the `t.col` part is kept.
fn from_database_error(err: &dyn sqlx::error::DatabaseError) -> DbError {
    let message = err.message();
    match err.kind() {
        ErrorKind::UniqueViolation => DbError::Duplicate {
            target: message
                .strip_prefix("UNIQUE constraint failed: ")
                .unwrap_or(message)
                .to_string(),
        },
        ErrorKind::ForeignKeyViolation => DbError::MissingReference(message.to_string()),
        ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
            DbError::ConstraintViolation(message.to_string())
        }
        _ => DbError::QueryFailed(message.to_string()),
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "no match"),
            sqlx::Error::Database(db_err) => from_database_error(db_err.as_ref()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("database is closed".to_string()),
            sqlx::Error::ColumnDecode { index, source } => DbError::corrupt(index, source),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Only order items are stored as JSON.
impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::corrupt("items", err)
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const INSERT_RESTAURANT: &str =
        "INSERT INTO restaurants (id, name, rating, created_at) VALUES (?1, 'Burger House', ?2, '2024-01-01T00:00:00Z')";

    async fn execute(db: &Database, sql: &str, id: &str, rating: f64) -> DbResult<()> {
        sqlx::query(sql)
            .bind(id)
            .bind(rating)
            .execute(db.pool())
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_key_names_the_column() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        execute(&db, INSERT_RESTAURANT, "r-1", 4.5).await.unwrap();

        let err = execute(&db, INSERT_RESTAURANT, "r-1", 4.5).await.unwrap_err();
        match err {
            DbError::Duplicate { target } => assert_eq!(target, "restaurants.id"),
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schema_rules_map_to_their_variants() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Ratings live in 0..=5.
        let err = execute(&db, INSERT_RESTAURANT, "r-2", 9.0).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));

        let err = execute(
            &db,
            "INSERT INTO menu_items (id, restaurant_id, label, price_cents, created_at) VALUES (?1, 'missing', 'Fries', ?2, '2024-01-01T00:00:00Z')",
            "m-1",
            350.0,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DbError::MissingReference(_)));

        let err = execute(&db, "SELEC ?1, ?2", "x", 0.0).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_row_and_closed_pool() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err: DbError = sqlx::query("SELECT id FROM restaurants")
            .fetch_one(db.pool())
            .await
            .err()
            .unwrap()
            .into();
        assert!(err.is_not_found());

        db.close().await;
        let err: DbError = sqlx::query("SELECT 1")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
