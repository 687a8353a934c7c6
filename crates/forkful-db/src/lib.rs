//! # forkful-db: Storage Layer for Forkful
//!
//! This crate is the backend collaborator of the Forkful client. Every
//! read and write the client makes (catalog, orders, addresses, profile)
//! goes through a repository here, backed by SQLite via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forkful Data Flow                                │
//! │                                                                         │
//! │  Client command (place_order, list_restaurants, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    forkful-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Restaurant    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Order         │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ Address       │    │              │  │   │
//! │  │   │ Management    │    │ Profile       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/forkful.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`seed`] - Sample restaurant catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forkful_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/forkful.db")).await?;
//! let restaurants = db.restaurants().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, StorageLocation};

// Repository re-exports for convenience
pub use repository::address::AddressRepository;
pub use repository::order::OrderRepository;
pub use repository::profile::ProfileRepository;
pub use repository::restaurant::RestaurantRepository;
