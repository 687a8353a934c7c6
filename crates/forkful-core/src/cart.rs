//! # Cart Module
//!
//! The in-memory shopping cart: quantity aggregation, per-restaurant
//! grouping and total computation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  User Action              CartStore call          State Change          │
//! │  ───────────              ──────────────          ────────────          │
//! │                                                                         │
//! │  Tap "+" on a dish ──────► add_item(line) ──────► qty += n or push     │
//! │                                                                         │
//! │  Tap "−" in the cart ────► remove_item(id) ─────► qty -= 1 or remove   │
//! │                                                                         │
//! │  Orders placed ──────────► remove_ordered() ────► qty -= ordered       │
//! │                                                                         │
//! │  "Empty cart" ───────────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  Badge / footer ─────────► item_count(), total() (read only)           │
//! │                                                                         │
//! │  Checkout ───────────────► group_by_restaurant() (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `line_id` (adding the same dish increases quantity)
//! - Quantity is always >= 1 (removing the last unit removes the line)
//! - Lines from several restaurants may coexist
//!
//! The store owns no locks and no I/O. The client session wraps one store
//! per user session; tests simply build a fresh one.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{MenuItem, OrderItem};
use crate::validation::{validate_price, validate_quantity, validate_required};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Cart Line
// =============================================================================

/// One distinct dish currently in the cart.
///
/// ## Price Freezing
/// `unit_price` and the display names are captured when the line is
/// created. Catalog edits after that point never re-price the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    line_id: String,
    restaurant_id: String,
    restaurant_name: String,
    name: String,
    unit_price: Money,
    quantity: u32,
}

impl CartLine {
    /// Creates a validated cart line.
    ///
    /// ## Errors
    /// - Blank ids or names → `ValidationError::Required`
    /// - Negative price or one above `MAX_PRICE_CENTS` → `ValidationError::OutOfRange`
    /// - Quantity 0 → `ValidationError::MustBePositive`
    /// - Quantity above 999 → `CoreError::QuantityTooLarge`
    pub fn new(
        line_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        restaurant_name: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> CoreResult<Self> {
        let line = CartLine {
            line_id: line_id.into(),
            restaurant_id: restaurant_id.into(),
            restaurant_name: restaurant_name.into(),
            name: name.into(),
            unit_price,
            quantity,
        };

        validate_required("line_id", &line.line_id, 64)?;
        validate_required("restaurant_id", &line.restaurant_id, 64)?;
        validate_required("restaurant_name", &line.restaurant_name, 200)?;
        validate_required("name", &line.name, 200)?;
        validate_price(line.unit_price)?;
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        Ok(line)
    }

    /// Builds a single-unit line for a menu item.
    ///
    /// The menu item id becomes the line id; the restaurant name is copied
    /// onto the line because menu items only carry the restaurant id.
    pub fn from_menu_item(item: &MenuItem, restaurant_name: &str) -> CoreResult<Self> {
        CartLine::new(
            item.id.clone(),
            item.restaurant_id.clone(),
            restaurant_name,
            item.label.clone(),
            item.price,
            1,
        )
    }

    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn restaurant_id(&self) -> &str {
        &self.restaurant_id
    }

    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Freezes this line into an order item.
    pub fn to_order_item(&self) -> OrderItem {
        OrderItem {
            item_id: self.line_id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Restaurant Group
// =============================================================================

/// The cart lines belonging to one restaurant.
///
/// Checkout turns every group into exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantGroup {
    pub restaurant_id: String,
    pub restaurant_name: String,
    /// Lines in cart order.
    pub lines: Vec<CartLine>,
    /// Sum of `unit_price × quantity` over `lines`.
    pub subtotal: Money,
}

impl RestaurantGroup {
    /// Number of units in this group.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The shopping cart.
///
/// ## Example
/// ```rust
/// use forkful_core::cart::{CartLine, CartStore};
/// use forkful_core::money::Money;
///
/// let mut cart = CartStore::new();
/// let pad_thai = CartLine::new("m-7", "r-2", "Thai Spice Garden", "Pad Thai", Money::from_cents(1899), 1).unwrap();
///
/// cart.add_item(pad_thai);
/// cart.remove_item("m-7");
/// assert!(cart.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        CartStore { lines: Vec::new() }
    }

    /// Adds a line to the cart or increases the quantity if already present.
    ///
    /// ## Behavior
    /// - Same `line_id` already in cart: its quantity grows by the incoming
    ///   quantity (the existing line keeps its position and frozen price),
    ///   capped at `MAX_ITEM_QUANTITY`
    /// - Otherwise: the line is appended at the end
    pub fn add_item(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.line_id == line.line_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .saturating_add(line.quantity)
                    .min(MAX_ITEM_QUANTITY);
            }
            None => self.lines.push(line),
        }
    }

    /// Removes one unit of a line.
    ///
    /// ## Behavior
    /// - Unknown `line_id`: no-op
    /// - Quantity > 1: decrement by one
    /// - Quantity == 1: the line is removed entirely
    pub fn remove_item(&mut self, line_id: &str) {
        let Some(index) = self.lines.iter().position(|l| l.line_id == line_id) else {
            return;
        };

        if self.lines[index].quantity > 1 {
            self.lines[index].quantity -= 1;
        } else {
            self.lines.remove(index);
        }
    }

    /// Clears all lines from the cart.
    ///
    /// ## When Used
    /// Only after every order derived from the cart has been persisted.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes the lines of already-ordered groups out of the cart.
    ///
    /// Each ordered line's quantity is subtracted from the matching cart
    /// line; lines that reach zero are removed. Anything added after the
    /// groups were taken stays in the cart.
    pub fn remove_ordered(&mut self, groups: &[RestaurantGroup]) {
        for ordered in groups.iter().flat_map(|g| &g.lines) {
            if let Some(index) = self.lines.iter().position(|l| l.line_id == ordered.line_id) {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_sub(ordered.quantity);
                if line.quantity == 0 {
                    self.lines.remove(index);
                }
            }
        }
    }

    /// Sum of `unit_price × quantity` over all lines.
    ///
    /// Computed in cents; format the result for display, never the parts.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units (for badges), not the number of distinct lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// Partitions the lines into one group per restaurant.
    ///
    /// ## Ordering
    /// ```text
    /// lines:  [A(R1), B(R2), C(R1)]
    ///              │
    ///              ▼
    /// groups: [R1: [A, C], R2: [B]]
    ///
    /// Restaurants in first-seen order; lines keep their relative order.
    /// ```
    pub fn group_by_restaurant(&self) -> Vec<RestaurantGroup> {
        let mut groups: Vec<RestaurantGroup> = Vec::new();

        for line in &self.lines {
            let index = match groups
                .iter()
                .position(|g| g.restaurant_id == line.restaurant_id)
            {
                Some(index) => index,
                None => {
                    groups.push(RestaurantGroup {
                        restaurant_id: line.restaurant_id.clone(),
                        restaurant_name: line.restaurant_name.clone(),
                        lines: Vec::new(),
                        subtotal: Money::zero(),
                    });
                    groups.len() - 1
                }
            };

            let group = &mut groups[index];
            group.subtotal += line.line_total();
            group.lines.push(line.clone());
        }

        groups
    }

    /// All lines in cart order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by id.
    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of distinct restaurants in the cart.
    pub fn restaurant_count(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.restaurant_id.as_str()) {
                seen.push(&line.restaurant_id);
            }
        }
        seen.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Summary of the derived values.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Cart totals summary for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: u32,
    pub restaurant_count: usize,
    pub total: Money,
}

impl From<&CartStore> for CartTotals {
    fn from(cart: &CartStore) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            restaurant_count: cart.restaurant_count(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::MAX_PRICE_CENTS;
    use chrono::Utc;

    fn line(id: &str, restaurant: &str, cents: i64, qty: u32) -> CartLine {
        CartLine::new(
            id,
            restaurant,
            format!("Restaurant {}", restaurant),
            format!("Dish {}", id),
            Money::from_cents(cents),
            qty,
        )
        .unwrap()
    }

    #[test]
    fn test_add_same_line_twice_merges() {
        let mut cart = CartStore::new();

        cart.add_item(line("A", "R1", 1000, 1));
        cart.add_item(line("A", "R1", 1000, 1));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("A").unwrap().quantity(), 2);
        assert_eq!(cart.total(), Money::from_cents(2000));
    }

    #[test]
    fn test_add_merges_incoming_quantity_and_keeps_position() {
        let mut cart = CartStore::new();

        cart.add_item(line("A", "R1", 500, 1));
        cart.add_item(line("B", "R1", 300, 1));
        cart.add_item(line("A", "R1", 500, 3));

        let ids: Vec<&str> = cart.lines().iter().map(CartLine::line_id).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(cart.line("A").unwrap().quantity(), 4);
    }

    #[test]
    fn test_merge_keeps_frozen_price() {
        let mut cart = CartStore::new();

        cart.add_item(line("A", "R1", 1000, 1));
        // Catalog price changed after the first add
        cart.add_item(line("A", "R1", 1200, 1));

        assert_eq!(cart.line("A").unwrap().unit_price(), Money::from_cents(1000));
        assert_eq!(cart.total(), Money::from_cents(2000));
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 1000, 2));
        cart.add_item(line("B", "R1", 250, 1));

        cart.remove_item("A");
        assert_eq!(cart.line("A").unwrap().quantity(), 1);

        cart.remove_item("A");
        assert!(cart.line("A").is_none());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Money::from_cents(250));
    }

    #[test]
    fn test_remove_unknown_line_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 1000, 2));
        let before = cart.clone();

        cart.remove_item("missing");

        assert_eq!(cart, before);
        assert_eq!(cart.totals(), before.totals());
    }

    #[test]
    fn test_total_is_idempotent() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 1299, 3));
        cart.add_item(line("B", "R2", 699, 1));
        let before = cart.clone();

        let first = cart.total();
        for _ in 0..10 {
            assert_eq!(cart.total(), first);
        }
        assert_eq!(cart, before);
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartStore::new();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.group_by_restaurant().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 999, 2));
        cart.add_item(line("B", "R2", 1500, 1));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_merge_caps_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 100, 998));
        cart.add_item(line("A", "R1", 100, 5));

        assert_eq!(cart.line("A").unwrap().quantity(), MAX_ITEM_QUANTITY);
        assert_eq!(cart.total(), Money::from_cents(99_900));
    }

    #[test]
    fn test_oversized_price_is_rejected() {
        let err = CartLine::new("A", "R1", "R", "Dish", Money::from_cents(i64::MAX / 2), 3);
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_most_expensive_cart_totals_exactly() {
        let mut cart = CartStore::new();
        for id in ["A", "B", "C"] {
            cart.add_item(
                CartLine::new(id, "R1", "R", "Dish", Money::from_cents(MAX_PRICE_CENTS), MAX_ITEM_QUANTITY)
                    .unwrap(),
            );
        }

        let expected = MAX_PRICE_CENTS * i64::from(MAX_ITEM_QUANTITY) * 3;
        assert_eq!(cart.total().cents(), expected);
        assert_eq!(cart.group_by_restaurant()[0].subtotal.cents(), expected);
    }

    #[test]
    fn test_remove_ordered_keeps_later_additions() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 1000, 2));
        cart.add_item(line("B", "R2", 1500, 1));
        let ordered = cart.group_by_restaurant();

        cart.add_item(line("A", "R1", 1000, 1));
        cart.add_item(line("C", "R3", 500, 1));
        cart.remove_ordered(&ordered);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.line("A").unwrap().quantity(), 1);
        assert!(cart.line("B").is_none());
        assert_eq!(cart.line("C").unwrap().quantity(), 1);

        let mut untouched = CartStore::new();
        untouched.add_item(line("A", "R1", 1000, 2));
        let ordered = untouched.group_by_restaurant();
        untouched.remove_ordered(&ordered);
        assert!(untouched.is_empty());
    }

    #[test]
    fn test_item_count_counts_units() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 100, 2));
        cart.add_item(line("B", "R1", 100, 3));

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_group_two_restaurants() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R1", 1000, 2));
        cart.add_item(line("B", "R2", 1500, 1));

        let groups = cart.group_by_restaurant();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].restaurant_id, "R1");
        assert_eq!(groups[0].restaurant_name, "Restaurant R1");
        assert!(groups[0].lines.iter().all(|l| l.restaurant_id() == "R1"));
        assert_eq!(groups[0].subtotal, Money::from_cents(2000));
        assert_eq!(groups[1].restaurant_id, "R2");
        assert!(groups[1].lines.iter().all(|l| l.restaurant_id() == "R2"));
        assert_eq!(groups[1].subtotal, Money::from_cents(1500));
    }

    #[test]
    fn test_group_order_is_first_seen() {
        let mut cart = CartStore::new();
        cart.add_item(line("A", "R2", 100, 1));
        cart.add_item(line("B", "R1", 100, 1));
        cart.add_item(line("C", "R2", 100, 1));

        let groups = cart.group_by_restaurant();
        let order: Vec<&str> = groups.iter().map(|g| g.restaurant_id.as_str()).collect();
        assert_eq!(order, ["R2", "R1"]);

        let r2: Vec<&str> = groups[0].lines.iter().map(CartLine::line_id).collect();
        assert_eq!(r2, ["A", "C"]);
        assert_eq!(cart.restaurant_count(), 2);
    }

    /// Deterministic pseudo-random sequence of adds and removes; after every
    /// step the derived values must match a recomputation from the lines.
    #[test]
    fn test_invariants_hold_across_mutation_sequences() {
        let mut cart = CartStore::new();
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as u32
        };

        for _ in 0..500 {
            let id = format!("item-{}", next() % 12);
            let restaurant = format!("R{}", next() % 4);
            if next() % 3 == 0 {
                cart.remove_item(&id);
            } else {
                let price = i64::from(next() % 3000);
                cart.add_item(line(&id, &restaurant, price, 1 + next() % 3));
            }

            let qty_sum: u32 = cart.lines().iter().map(|l| l.quantity()).sum();
            let cents_sum: i64 = cart
                .lines()
                .iter()
                .map(|l| l.unit_price().cents() * i64::from(l.quantity()))
                .sum();
            assert_eq!(cart.item_count(), qty_sum);
            assert_eq!(cart.total().cents(), cents_sum);
            assert!(cart.lines().iter().all(|l| l.quantity() >= 1));

            let mut ids: Vec<&str> = cart.lines().iter().map(CartLine::line_id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), cart.line_count());

            let groups = cart.group_by_restaurant();
            let mut regrouped: Vec<&CartLine> = groups.iter().flat_map(|g| g.lines.iter()).collect();
            let mut original: Vec<&CartLine> = cart.lines().iter().collect();
            regrouped.sort_by(|a, b| a.line_id().cmp(b.line_id()));
            original.sort_by(|a, b| a.line_id().cmp(b.line_id()));
            assert_eq!(regrouped, original);

            let group_total: Money = groups.iter().map(|g| g.subtotal).sum();
            assert_eq!(group_total, cart.total());
        }
    }

    #[test]
    fn test_line_validation() {
        assert!(CartLine::new("", "R1", "R", "Dish", Money::from_cents(100), 1).is_err());
        assert!(CartLine::new("A", "R1", "R", "Dish", Money::from_cents(-1), 1).is_err());
        assert!(CartLine::new("A", "R1", "R", "Dish", Money::from_cents(100), 0).is_err());
        assert!(matches!(
            CartLine::new("A", "R1", "R", "Dish", Money::from_cents(100), 1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(CartLine::new("A", "R1", "R", "Free bread", Money::zero(), 1).is_ok());
    }

    #[test]
    fn test_from_menu_item() {
        let item = MenuItem {
            id: "m-1".to_string(),
            restaurant_id: "r-1".to_string(),
            label: "Classic Burger".to_string(),
            description: "Angus beef".to_string(),
            price: Money::from_cents(1299),
            image: String::new(),
            category: "Burgers".to_string(),
            created_at: Utc::now(),
        };

        let line = CartLine::from_menu_item(&item, "Burger House").unwrap();

        assert_eq!(line.line_id(), "m-1");
        assert_eq!(line.restaurant_name(), "Burger House");
        assert_eq!(line.name(), "Classic Burger");
        assert_eq!(line.quantity(), 1);

        let order_item = line.to_order_item();
        assert_eq!(order_item.item_id, "m-1");
        assert_eq!(order_item.line_total(), Money::from_cents(1299));
    }

    #[test]
    fn test_line_serializes_camel_case() {
        let json = serde_json::to_value(line("A", "R1", 1000, 2)).unwrap();
        assert_eq!(json["lineId"], "A");
        assert_eq!(json["unitPrice"], 1000);
        assert_eq!(json["quantity"], 2);
    }
}
