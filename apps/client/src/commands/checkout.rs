//! # Checkout Commands
//!
//! Turns the cart into one pending order per restaurant.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         place_order                                     │
//! │                                                                         │
//! │  1. Resolve delivery address                                           │
//! │     └── none selected, none entered → rejected, nothing written        │
//! │                                                                         │
//! │  2. Snapshot cart groups                                               │
//! │     └── empty → rejected, nothing written                              │
//! │                                                                         │
//! │  3. Verify the saved address / save the new one (reused if identical)  │
//! │                                                                         │
//! │  4. Submit orders through the OrderGateway                             │
//! │     ├── Sequential: one call per restaurant, in cart order             │
//! │     │   └── failure → stop, keep earlier orders, report which failed   │
//! │     └── Atomic: one transaction for every restaurant                   │
//! │         └── failure → nothing written                                  │
//! │                                                                         │
//! │  5. All placed → remove the ordered lines from the cart                 │
//! │     Any failure → cart kept exactly as it was                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, CheckoutError};
use crate::state::{CartState, CheckoutMode, ConfigState, DbState};
use forkful_core::checkout::{plan_orders, resolve_delivery, DeliveryChoice};
use forkful_core::{CoreError, Money, NewAddress, NewOrder, Order};
use forkful_db::{Database, DbError, DbResult};

/// Where placed orders are sent.
///
/// The local database implements this directly; tests swap in gateways
/// that fail on demand.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Persists a single order.
    async fn create_order(&self, order: &NewOrder) -> DbResult<Order>;

    /// Persists every order or none of them.
    async fn create_orders_atomic(&self, orders: &[NewOrder]) -> DbResult<Vec<Order>>;
}

#[async_trait]
impl OrderGateway for Database {
    async fn create_order(&self, order: &NewOrder) -> DbResult<Order> {
        self.orders().insert(order).await
    }

    async fn create_orders_atomic(&self, orders: &[NewOrder]) -> DbResult<Vec<Order>> {
        self.orders().insert_many_atomic(orders).await
    }
}

/// Checkout request from the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Saved address picked on the checkout screen.
    pub selected_address_id: Option<String>,

    /// Address typed in at checkout. Wins over `selected_address_id`.
    pub new_address: Option<NewAddress>,
}

/// Result of a fully successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// One order per restaurant, in cart order.
    pub orders: Vec<Order>,
    pub address_id: String,
    pub total: Money,
}

/// Runs a checkout against any gateway.
///
/// Addresses are always read and written through `db`; only order
/// creation goes through `gateway`.
pub async fn submit_checkout<G>(
    gateway: &G,
    db: &Database,
    cart: &CartState,
    config: &ConfigState,
    request: &PlaceOrderRequest,
) -> Result<CheckoutReceipt, CheckoutError>
where
    G: OrderGateway + ?Sized,
{
    let choice = resolve_delivery(
        request.selected_address_id.as_deref(),
        request.new_address.as_ref(),
    )?;

    let groups = cart.with_cart(|c| c.group_by_restaurant());
    if groups.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let address_id = match choice {
        DeliveryChoice::Saved(id) => {
            match db.addresses().get(&config.user_id, &id).await {
                Ok(Some(address)) => address.id,
                Ok(None) => return Err(CheckoutError::Address(DbError::not_found("Address", id))),
                Err(e) => return Err(CheckoutError::Address(e)),
            }
        }
        DeliveryChoice::New(address) => {
            let addresses = db.addresses();
            // A resubmitted checkout reuses the address saved on the first try.
            let existing = addresses
                .find_same(&config.user_id, &address)
                .await
                .map_err(CheckoutError::Address)?;
            match existing {
                Some(saved) => saved.id,
                None => {
                    addresses
                        .insert(&config.user_id, &address)
                        .await
                        .map_err(CheckoutError::Address)?
                        .id
                }
            }
        }
    };

    let planned = plan_orders(&groups, &config.user_id, &address_id, Utc::now())?;
    debug!(orders = planned.len(), mode = ?config.checkout_mode, "Submitting orders");

    let placed = match config.checkout_mode {
        CheckoutMode::Sequential => {
            let mut placed = Vec::with_capacity(planned.len());
            for order in &planned {
                match gateway.create_order(order).await {
                    Ok(created) => {
                        debug!(order_id = %created.id, restaurant = %created.restaurant_name, "Order placed");
                        placed.push(created);
                    }
                    Err(source) => {
                        warn!(
                            restaurant = %order.restaurant_name,
                            placed = placed.len(),
                            error = %source,
                            "Order submission failed, stopping checkout"
                        );
                        return Err(CheckoutError::Submission {
                            restaurant_id: order.restaurant_id.clone(),
                            restaurant_name: order.restaurant_name.clone(),
                            placed,
                            source,
                        });
                    }
                }
            }
            placed
        }
        CheckoutMode::Atomic => gateway
            .create_orders_atomic(&planned)
            .await
            .map_err(CheckoutError::AtomicSubmission)?,
    };

    // Lines added while the orders were in flight stay in the cart.
    cart.with_cart_mut(|c| c.remove_ordered(&groups));

    let total: Money = placed.iter().map(|o| o.total_amount).sum();
    info!(
        orders = placed.len(),
        total = %total,
        address_id = %address_id,
        "Checkout complete"
    );

    Ok(CheckoutReceipt {
        orders: placed,
        address_id,
        total,
    })
}

/// Places the cart as orders in the local database.
///
/// ## Errors
/// - `VALIDATION_ERROR`: no delivery address, or an invalid new address
/// - `CART_ERROR`: the cart is empty
/// - `CHECKOUT_FAILED`: the address or an order could not be stored; the
///   message names what was already placed and the cart is kept
pub async fn place_order(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    request: &PlaceOrderRequest,
) -> Result<CheckoutReceipt, ApiError> {
    debug!("place_order command");

    let database = db.inner();
    submit_checkout(database, database, cart, config, request)
        .await
        .map_err(ApiError::from)
}
