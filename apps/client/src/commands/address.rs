//! # Address Commands
//!
//! Saved delivery addresses of the session user.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use forkful_core::checkout::preselected_address;
use forkful_core::validation::validate_new_address;
use forkful_core::{Address, NewAddress};

/// What the checkout screen needs to render its address picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAddresses {
    pub addresses: Vec<Address>,
    /// Default address, else the first one, else none (manual entry).
    pub preselected_id: Option<String>,
}

/// Lists the user's addresses, default first.
pub async fn list_addresses(db: &DbState, config: &ConfigState) -> Result<Vec<Address>, ApiError> {
    debug!(user_id = %config.user_id, "list_addresses command");
    Ok(db.inner().addresses().list_for_user(&config.user_id).await?)
}

/// Saves a new address. The user's first address becomes the default.
pub async fn add_address(
    db: &DbState,
    config: &ConfigState,
    address: &NewAddress,
) -> Result<Address, ApiError> {
    debug!(user_id = %config.user_id, "add_address command");

    validate_new_address(address)?;
    Ok(db.inner().addresses().insert(&config.user_id, address).await?)
}

/// Makes an address the user's only default.
pub async fn set_default_address(
    db: &DbState,
    config: &ConfigState,
    id: &str,
) -> Result<Address, ApiError> {
    debug!(id = %id, "set_default_address command");
    Ok(db.inner().addresses().set_default(&config.user_id, id).await?)
}

/// Deletes one of the user's addresses.
pub async fn delete_address(db: &DbState, config: &ConfigState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_address command");
    Ok(db.inner().addresses().delete(&config.user_id, id).await?)
}

/// Loads the addresses for the checkout screen.
///
/// A failed read is not fatal: the list comes back empty and the user
/// types an address in instead.
pub async fn checkout_addresses(db: &DbState, config: &ConfigState) -> CheckoutAddresses {
    let addresses = match db.inner().addresses().list_for_user(&config.user_id).await {
        Ok(addresses) => addresses,
        Err(e) => {
            warn!(error = %e, "Could not load saved addresses, falling back to manual entry");
            Vec::new()
        }
    };

    let preselected_id = preselected_address(&addresses).map(|a| a.id.clone());

    CheckoutAddresses {
        addresses,
        preselected_id,
    }
}
