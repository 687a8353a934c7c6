//! # Domain Types
//!
//! Core domain types used throughout Forkful.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Restaurant    │   │    MenuItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  restaurant_id  │   │  restaurant_id  │       │
//! │  │  name           │   │  label          │   │  items (frozen) │       │
//! │  │  cuisine_type   │   │  price (Money)  │   │  total_amount   │       │
//! │  │  rating         │   │  category       │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   │  address_id ────┼──┐    │
//! │                                              └─────────────────┘  │    │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │    │
//! │  │    Profile      │   │  OrderStatus    │   │    Address      │◄─┘    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  full_name      │   │  Pending ...    │   │  address_line1  │       │
//! │  │  phone_number   │   │  Delivered      │   │  is_default     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Orders copy the item name and unit price at the moment they are placed.
//! Later catalog edits never re-price an order already submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Restaurant & Menu
// =============================================================================

/// A restaurant listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Brand the restaurant belongs to ("Burger Chain").
    pub chain_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cuisine_type: String,
    /// Market segment ("Casual Dining", "Fine Dining", ...).
    pub segment: String,
    pub city: String,
    pub area: String,
    /// Average rating, 0.0 to 5.0. Display and ordering only.
    pub rating: f64,
    pub cover_image: String,
    /// Delivery window shown to the user, e.g. "25-35".
    pub delivery_time: String,
    pub minimum_order: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A purchasable dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    /// Display name of the dish.
    pub label: String,
    pub description: String,
    pub price: Money,
    pub image: String,
    pub category: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A restaurant together with its menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithMenu {
    pub restaurant: Restaurant,
    pub menu_items: Vec<MenuItem>,
}

impl RestaurantWithMenu {
    /// Groups the menu by category, in the order categories first appear.
    ///
    /// ## Example
    /// ```text
    /// [Burger(Burgers), Fries(Sides), Cheeseburger(Burgers)]
    ///   → [("Burgers", [Burger, Cheeseburger]), ("Sides", [Fries])]
    /// ```
    pub fn menu_by_category(&self) -> Vec<(&str, Vec<&MenuItem>)> {
        let mut sections: Vec<(&str, Vec<&MenuItem>)> = Vec::new();

        for item in &self.menu_items {
            match sections.iter_mut().find(|(c, _)| *c == item.category) {
                Some((_, items)) => items.push(item),
                None => sections.push((item.category.as_str(), vec![item])),
            }
        }

        sections
    }
}

/// Optional catalog filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantFilter {
    pub cuisine_type: Option<String>,
    pub segment: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub min_rating: Option<f64>,
}

// =============================================================================
// Address
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub user_id: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// At most one address per user is the default.
    pub is_default: bool,
}

impl Address {
    /// Single-line rendering for confirmations and logs.
    pub fn one_line(&self) -> String {
        match &self.address_line2 {
            Some(line2) => format!(
                "{}, {}, {}, {} {}",
                self.address_line1, line2, self.city, self.state, self.postal_code
            ),
            None => format!(
                "{}, {}, {} {}",
                self.address_line1, self.city, self.state, self.postal_code
            ),
        }
    }
}

/// The user-entered fields of an address that hasn't been saved yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

// =============================================================================
// Profile
// =============================================================================

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Same id as the authenticated user.
    pub id: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its delivery lifecycle.
///
/// ## Transitions
/// ```text
/// Pending ──► Confirmed ──► Preparing ──► Ready ──► Delivered
///    │            │
///    └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed by the user, not yet accepted by the restaurant.
    Pending,
    Confirmed,
    Preparing,
    /// Waiting for pickup by the courier.
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Lowercase wire name, as stored in the `orders.status` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never change again.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Checks whether an order may move from `self` to `next`.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, Ready)
                | (Ready, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    /// Validates a transition, returning the new status.
    pub fn transition_to(&self, next: OrderStatus) -> CoreResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::invalid_format("status", format!("unknown status '{s}'")))
    }
}

// =============================================================================
// Order
// =============================================================================

/// One dish inside an order, frozen at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item id (the cart line id).
    pub item_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderItem {
    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// An order for a single restaurant, ready to be persisted.
///
/// Built by [`crate::checkout::plan_orders`], one per restaurant group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub address_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub address_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Combines a stored id with the submitted record.
    pub fn from_new(id: impl Into<String>, order: NewOrder) -> Self {
        Order {
            id: id.into(),
            user_id: order.user_id,
            restaurant_id: order.restaurant_id,
            restaurant_name: order.restaurant_name,
            items: order.items,
            total_amount: order.total_amount,
            status: order.status,
            address_id: order.address_id,
            created_at: order.created_at,
        }
    }

    /// Total number of units across all items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_item(id: &str, category: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            restaurant_id: "r-1".to_string(),
            label: format!("Dish {}", id),
            description: String::new(),
            price: Money::from_cents(999),
            image: String::new(),
            category: category.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_status_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_status_rejected_transitions() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Pending));

        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }

        let err = OrderStatus::Delivered
            .transition_to(OrderStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("PENDING".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
    }

    #[test]
    fn test_menu_by_category_keeps_first_seen_order() {
        let restaurant = RestaurantWithMenu {
            restaurant: Restaurant {
                id: "r-1".to_string(),
                name: "Burger House".to_string(),
                chain_name: "Burger Chain".to_string(),
                address: "123 Main St".to_string(),
                latitude: 40.7128,
                longitude: -74.0060,
                cuisine_type: "American".to_string(),
                segment: "Casual Dining".to_string(),
                city: "New York".to_string(),
                area: "Manhattan".to_string(),
                rating: 4.5,
                cover_image: String::new(),
                delivery_time: "25-35".to_string(),
                minimum_order: Money::from_cents(1500),
                created_at: Utc::now(),
            },
            menu_items: vec![
                menu_item("1", "Burgers"),
                menu_item("2", "Sides"),
                menu_item("3", "Burgers"),
            ],
        };

        let sections = restaurant.menu_by_category();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "Burgers");
        assert_eq!(sections[0].1.len(), 2);
        assert_eq!(sections[0].1[1].id, "3");
        assert_eq!(sections[1].0, "Sides");
    }

    #[test]
    fn test_address_one_line() {
        let mut address = Address {
            id: "a-1".to_string(),
            user_id: "u-1".to_string(),
            address_line1: "123 Main St".to_string(),
            address_line2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            postal_code: "10001".to_string(),
            is_default: true,
        };
        assert_eq!(address.one_line(), "123 Main St, New York, NY 10001");

        address.address_line2 = Some("Apt 4".to_string());
        assert_eq!(address.one_line(), "123 Main St, Apt 4, New York, NY 10001");
    }
}
