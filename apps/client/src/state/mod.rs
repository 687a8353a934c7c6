//! # State Module
//!
//! Session state for the Forkful client.
//!
//! Instead of a single `AppState` struct, each concern gets its own state
//! type and every command takes only the ones it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Database    │  │  Arc<Mutex<  │  │  user_id         │              │
//! │  │  (SQLite     │  │   CartStore  │  │  currency_symbol │              │
//! │  │   pool)      │  │  >>          │  │  checkout_mode   │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::{CheckoutMode, ConfigState};
pub use db::DbState;
