//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! The `Database` struct from `forkful-db` contains a `SqlitePool`, which is
//! internally synchronized; commands run queries concurrently without any
//! extra locking.

use forkful_db::Database;

/// Session-managed database handle.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let restaurants = db_state.inner().restaurants().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
