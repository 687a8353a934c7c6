//! # Checkout Planning
//!
//! The pure half of placing an order: deciding where the food goes and
//! turning the cart into one order record per restaurant. Persisting those
//! records is the client's job.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Flow                                     │
//! │                                                                         │
//! │  1. resolve_delivery(selected, new)   ← THIS MODULE                    │
//! │     └── neither? → CoreError::NoDeliveryAddress (nothing sent)         │
//! │                                                                         │
//! │  2. (client) save the new address if one was entered                   │
//! │                                                                         │
//! │  3. plan_orders(cart.group_by_restaurant(), ...)  ← THIS MODULE        │
//! │     └── one NewOrder per restaurant, status = pending                  │
//! │                                                                         │
//! │  4. (client) submit the orders, clear the cart when all succeeded      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::cart::{CartLine, RestaurantGroup};
use crate::error::{CoreError, CoreResult};
use crate::types::{Address, NewAddress, NewOrder, OrderStatus};
use crate::validation::validate_new_address;

/// Where the orders of one checkout will be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryChoice {
    /// A saved address, by id.
    Saved(String),
    /// An address typed in at checkout; saved before any order is sent.
    New(NewAddress),
}

/// Decides the delivery address for a checkout.
///
/// ## Rules
/// - A new address, when supplied, wins over the selected saved address
/// - A new address must pass [`validate_new_address`]
/// - Neither → [`CoreError::NoDeliveryAddress`]
///
/// ## Example
/// ```rust
/// use forkful_core::checkout::{resolve_delivery, DeliveryChoice};
///
/// let choice = resolve_delivery(Some("addr-1"), None).unwrap();
/// assert_eq!(choice, DeliveryChoice::Saved("addr-1".to_string()));
///
/// assert!(resolve_delivery(None, None).is_err());
/// ```
pub fn resolve_delivery(
    selected_address_id: Option<&str>,
    new_address: Option<&NewAddress>,
) -> CoreResult<DeliveryChoice> {
    if let Some(address) = new_address {
        validate_new_address(address)?;
        return Ok(DeliveryChoice::New(address.clone()));
    }

    match selected_address_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(DeliveryChoice::Saved(id.to_string())),
        _ => Err(CoreError::NoDeliveryAddress),
    }
}

/// Picks the address to preselect on the checkout screen.
///
/// The default address if there is one, otherwise the first saved
/// address, otherwise none (the user must type one in).
pub fn preselected_address(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.is_default)
        .or_else(|| addresses.first())
}

/// Builds one pending order per restaurant group.
///
/// ## Arguments
/// * `groups` - Output of `CartStore::group_by_restaurant`
/// * `user_id` - The session user placing the orders
/// * `address_id` - Resolved delivery address
/// * `created_at` - One timestamp shared by every order of this checkout
///
/// ## Errors
/// `CoreError::EmptyCart` when there are no groups.
pub fn plan_orders(
    groups: &[RestaurantGroup],
    user_id: &str,
    address_id: &str,
    created_at: DateTime<Utc>,
) -> CoreResult<Vec<NewOrder>> {
    if groups.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let orders = groups
        .iter()
        .map(|group| NewOrder {
            user_id: user_id.to_string(),
            restaurant_id: group.restaurant_id.clone(),
            restaurant_name: group.restaurant_name.clone(),
            items: group.lines.iter().map(CartLine::to_order_item).collect(),
            total_amount: group.subtotal,
            status: OrderStatus::Pending,
            address_id: address_id.to_string(),
            created_at,
        })
        .collect();

    Ok(orders)
}

// =============================================================================
// Unit Tests
// =============================================================================
