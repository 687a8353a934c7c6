//! # Database Handle
//!
//! Opens the SQLite store behind a Forkful session.
//!
//! ## Storage Locations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where the data lives                               │
//! │                                                                         │
//! │  StorageLocation::File(path)          StorageLocation::Memory          │
//! │  ───────────────────────────          ───────────────────────          │
//! │  forkful.db in the data dir           private to one process          │
//! │  WAL journal: catalog reads run       one connection, never recycled  │
//! │  while an order is being written      (dropping it drops the data)    │
//! │  FILE_POOL_SIZE connections           used by every test              │
//! │                                                                         │
//! │  Both: foreign keys on, busy_timeout so a checkout that meets another  │
//! │  writer waits instead of failing with SQLITE_BUSY.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::address::AddressRepository;
use crate::repository::order::OrderRepository;
use crate::repository::profile::ProfileRepository;
use crate::repository::restaurant::RestaurantRepository;

/// Connections for a file database: one writer plus readers for the
/// catalog, address and order screens.
const FILE_POOL_SIZE: u32 = 4;

/// How long a write waits for a lock held by another connection.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a command waits for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the SQLite data is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A database file, created on first open.
    File(PathBuf),
    /// A throwaway database for tests.
    Memory,
}

/// How to open a [`Database`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: StorageLocation,
    pub busy_timeout: Duration,
    /// Apply pending migrations while opening. Default: true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file-backed database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: StorageLocation::File(path.into()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            run_migrations: true,
        }
    }

    /// A fresh, empty database that lives as long as the returned handle.
    pub fn in_memory() -> Self {
        DbConfig {
            location: StorageLocation::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            run_migrations: true,
        }
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            StorageLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            StorageLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);

        match self.location {
            StorageLocation::File(_) => options.max_connections(FILE_POOL_SIZE),
            // Every new connection to :memory: is a different, empty database.
            StorageLocation::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        }
    }
}

/// Shared handle to the session's store; clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./forkful.db")).await?;
/// let restaurants = db.restaurants().list().await?;
/// let orders = db.orders().list_for_user(&user_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(busy_timeout_ms = config.busy_timeout.as_millis() as u64, "Database pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any migrations not yet recorded in the database.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw pool, for diagnostics such as `migration_status`.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn restaurants(&self) -> RestaurantRepository {
        RestaurantRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn addresses(&self) -> AddressRepository {
        AddressRepository::new(self.pool.clone())
    }

    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later calls fail with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
