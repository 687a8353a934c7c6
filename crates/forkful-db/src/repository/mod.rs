//! # Repository Module
//!
//! Database repository implementations for Forkful.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Client command                                                        │
//! │       │                                                                 │
//! │       │  db.restaurants().search("thai")                               │
//! │       ▼                                                                 │
//! │  RestaurantRepository                                                  │
//! │  ├── list(&self)                                                       │
//! │  ├── get_with_menu(&self, id)                                          │
//! │  └── search(&self, term)                                               │
//! │       │                                                                 │
//! │       │  SQL query → *Row (sqlx::FromRow) → forkful-core type          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row structs mirror the table columns (integer cents, JSON text) and are
//! converted into the domain types at the repository boundary, so nothing
//! above this module sees a raw column.
//!
//! ## Available Repositories
//!
//! - [`restaurant::RestaurantRepository`] - Catalog reads and seeding inserts
//! - [`order::OrderRepository`] - Order inserts, history, status updates
//! - [`address::AddressRepository`] - Saved delivery addresses
//! - [`profile::ProfileRepository`] - User profile

pub mod address;
pub mod order;
pub mod profile;
pub mod restaurant;
