//! # Order Commands
//!
//! Order history and status changes. Placing orders lives in
//! `checkout.rs`.

use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use forkful_core::{Order, OrderStatus};

/// Lists the session user's orders, newest first.
pub async fn list_orders(db: &DbState, config: &ConfigState) -> Result<Vec<Order>, ApiError> {
    debug!(user_id = %config.user_id, "list_orders command");
    Ok(db.inner().orders().list_for_user(&config.user_id).await?)
}

/// Gets one of the session user's orders.
///
/// Another user's order is reported as not found.
pub async fn get_order(db: &DbState, config: &ConfigState, id: &str) -> Result<Order, ApiError> {
    debug!(id = %id, "get_order command");

    db.inner()
        .orders()
        .get_by_id(id)
        .await?
        .filter(|o| o.user_id == config.user_id)
        .ok_or_else(|| ApiError::not_found("Order", id))
}

/// Moves an order to a new status.
///
/// ## Errors
/// `BUSINESS_LOGIC` when the lifecycle doesn't allow the transition
/// (e.g. cancelling a delivered order).
pub async fn update_order_status(
    db: &DbState,
    id: &str,
    status: OrderStatus,
) -> Result<Order, ApiError> {
    debug!(id = %id, %status, "update_order_status command");
    Ok(db.inner().orders().update_status(id, status).await?)
}
