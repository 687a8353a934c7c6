//! # Forkful Client Library
//!
//! Session layer of the Forkful food-ordering client: state, commands and
//! the startup sequence used by the `forkful-client` binary.
//!
//! ## Module Organization
//! ```text
//! forkful_client/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Shared cart (Arc<Mutex<CartStore>>)
//! │   └── config.rs   ◄─── Session configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Restaurants and menus
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── checkout.rs ◄─── Placing orders
//! │   ├── address.rs  ◄─── Delivery addresses
//! │   ├── profile.rs  ◄─── User profile
//! │   └── order.rs    ◄─── Order history
//! └── error.rs        ◄─── ApiError and CheckoutError
//! ```

pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use state::{CartState, ConfigState, DbState};
use forkful_db::seed::{seed_catalog, SeedOutcome};
use forkful_db::{Database, DbConfig};

/// Starts a client session.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Client Startup                                    │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,forkful=debug,sqlx=warn (override with RUST_LOG)    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • FORKFUL_* environment variables over defaults                     │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • FORKFUL_DB_PATH or the platform data directory                    │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  4. Seed Catalog (FORKFUL_SEED=1, empty database only) ───────────────► │
/// │                                                                         │
/// │  5. Initialize State Objects & log a catalog summary ─────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Forkful client");

    let config = ConfigState::from_env();
    let db_path = get_database_path(&config)?;
    info!(?db_path, user_id = %config.user_id, mode = ?config.checkout_mode, "Configuration loaded");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    if config.seed_catalog {
        match seed_catalog(&db).await? {
            SeedOutcome::Skipped { existing } => {
                info!(existing, "Catalog already present, skipping seed")
            }
            SeedOutcome::Seeded {
                restaurants,
                menu_items,
            } => info!(restaurants, menu_items, "Sample catalog seeded"),
        }
    }

    let db_state = DbState::new(db);
    let cart_state = CartState::new();

    let restaurants = commands::catalog::list_restaurants(&db_state).await?;
    if restaurants.is_empty() {
        warn!("Catalog is empty; set FORKFUL_SEED=1 to load the sample restaurants");
    }
    for restaurant in &restaurants {
        info!(
            name = %restaurant.name,
            cuisine = %restaurant.cuisine_type,
            rating = restaurant.rating,
            minimum_order = %config.format_currency(restaurant.minimum_order.cents()),
            "Restaurant available"
        );
    }

    let cart = commands::cart::get_cart(&cart_state);
    let orders = commands::order::list_orders(&db_state, &config).await?;
    info!(
        restaurants = restaurants.len(),
        cart_items = cart.totals.item_count,
        orders = orders.len(),
        "Session ready"
    );

    db_state.inner().close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=forkful=trace` - Show trace for forkful crates only
/// - Default: `info,forkful=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forkful=debug,sqlx=warn"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.forkful.client/forkful.db`
/// - **Windows**: `%APPDATA%\forkful\client\data\forkful.db`
/// - **Linux**: `~/.local/share/client/forkful.db`
///
/// ## Development Override
/// `FORKFUL_DB_PATH` (via [`ConfigState`]) wins when set.
fn get_database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "forkful", "client")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("forkful.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_override() {
        let config = ConfigState {
            database_path: Some(PathBuf::from("/tmp/forkful-override.db")),
            ..ConfigState::default()
        };
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/forkful-override.db")
        );
    }
}
