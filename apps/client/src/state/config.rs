//! # Configuration State
//!
//! Session configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FORKFUL_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use forkful_core::validation::validate_uuid;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// User id used when `FORKFUL_USER_ID` is not set.
pub const DEV_USER_ID: &str = "00000000-0000-4000-8000-000000000001";

/// How a multi-restaurant checkout is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// One create call per restaurant, in cart order; a failure stops the
    /// remaining restaurants and keeps the orders already placed.
    #[default]
    Sequential,

    /// Every restaurant's order in one transaction: all or nothing.
    Atomic,
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// The signed-in user; scopes addresses, profile and orders.
    pub user_id: String,

    /// Database file override. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Submission strategy for `place_order`
    pub checkout_mode: CheckoutMode,

    /// Seed the sample catalog on startup when the database is empty
    pub seed_catalog: bool,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        ConfigState {
            user_id: DEV_USER_ID.to_string(),
            database_path: None,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            checkout_mode: CheckoutMode::Sequential,
            seed_catalog: false,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FORKFUL_DB_PATH`: Database file path
    /// - `FORKFUL_USER_ID`: Session user (UUID)
    /// - `FORKFUL_CURRENCY_SYMBOL`: Display symbol
    /// - `FORKFUL_ATOMIC_CHECKOUT`: `1`/`true` for all-or-nothing checkout
    /// - `FORKFUL_SEED`: `1`/`true` to seed an empty catalog
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("FORKFUL_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(user_id) = lookup("FORKFUL_USER_ID") {
            let user_id = user_id.trim().to_string();
            match validate_uuid("FORKFUL_USER_ID", &user_id) {
                Ok(()) => config.user_id = user_id,
                Err(e) => warn!(error = %e, "Ignoring FORKFUL_USER_ID, using development user"),
            }
        }

        if let Some(symbol) = lookup("FORKFUL_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if lookup("FORKFUL_ATOMIC_CHECKOUT").is_some_and(|v| is_truthy(&v)) {
            config.checkout_mode = CheckoutMode::Atomic;
        }

        config.seed_catalog = lookup("FORKFUL_SEED").is_some_and(|v| is_truthy(&v));

        config
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
