//! # Forkful Client Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forkful Client                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Client (this crate)                      │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Hands off to lib.rs                              │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► Logging, configuration, database, seeding        │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► catalog, cart, checkout, addresses, orders       │  │
//! │  │                                                                  │  │
//! │  │  state/ ─────► DbState, CartState, ConfigState                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  forkful.db (local file, WAL mode)                               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    forkful_client::run().await
}
