//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Orders  │       │
//! │  │  Cart    │     │          │     │          │     │  placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │          add_menu_item_to_cart      place_order      cart cleared      │
//! │               remove_from_cart     (checkout.rs)                       │
//! │                        │                 │                              │
//! │                        ▼                 ▼ failure                      │
//! │                   clear_cart        cart kept as is                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartState, DbState};
use forkful_core::{CartLine, CartStore, CartTotals, RestaurantGroup};

/// Cart response including lines, restaurant groups and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub groups: Vec<RestaurantGroup>,
    pub totals: CartTotals,
}

impl From<&CartStore> for CartResponse {
    fn from(cart: &CartStore) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            groups: cart.group_by_restaurant(),
            totals: cart.totals(),
        }
    }
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CART                                                  4 items          │
/// ├─────────────────────────────────────────────────────────────────────────┤
/// │  Burger House                                                           │
/// │    Classic Burger         x2                    $25.98                 │
/// │    Milkshake              x1                     $5.99                 │
/// │  Thai Spice Garden                                                      │
/// │    Pad Thai               x1                    $18.99                 │
/// ├─────────────────────────────────────────────────────────────────────────┤
/// │  TOTAL (2 restaurants)                          $50.96                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a menu item to the cart.
///
/// ## Behavior
/// - Item already in cart: quantity increases by one
/// - Item not in cart: appended as a new line
/// - Price is "frozen" at time of adding (later menu edits don't re-price)
///
/// ## Arguments
/// * `item_id` - Menu item id
///
/// ## Errors
/// `NOT_FOUND` when the menu item or its restaurant doesn't exist.
pub async fn add_menu_item_to_cart(
    db: &DbState,
    cart: &CartState,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, "add_menu_item_to_cart command");

    let restaurants = db.inner().restaurants();

    let item = restaurants
        .get_menu_item(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item", item_id))?;

    let restaurant = restaurants
        .get(&item.restaurant_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Restaurant", &item.restaurant_id))?;

    let line = CartLine::from_menu_item(&item, &restaurant.name)?;

    let response = cart.with_cart_mut(|c| {
        c.add_item(line);
        CartResponse::from(&*c)
    });

    info!(
        item = %item.label,
        restaurant = %restaurant.name,
        items = response.totals.item_count,
        "Added to cart"
    );
    Ok(response)
}

/// Removes one unit of a line from the cart.
///
/// Unknown ids are ignored; a line at quantity 1 disappears.
pub fn remove_from_cart(cart: &CartState, line_id: &str) -> CartResponse {
    debug!(line_id = %line_id, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        c.remove_item(line_id);
        CartResponse::from(&*c)
    })
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}
