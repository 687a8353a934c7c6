//! # Cart State
//!
//! The session's shopping cart, shared by every command.
//!
//! ## Thread Safety
//! The `CartStore` from `forkful-core` is a plain owned struct. The session
//! wraps it in `Arc<Mutex<T>>` so command handlers running on different
//! tasks see the same cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  User Action              Command                   Cart Change         │
//! │  ───────────              ───────                   ───────────         │
//! │                                                                         │
//! │  Tap menu item ─────────► add_menu_item_to_cart() ► add_item(line)     │
//! │                                                                         │
//! │  Tap "−" ───────────────► remove_from_cart() ─────► remove_item(id)    │
//! │                                                                         │
//! │  Clear ─────────────────► clear_cart() ───────────► clear()            │
//! │                                                                         │
//! │  Place order ───────────► place_order() ──────────► snapshot groups,   │
//! │                                                     unlock, submit,     │
//! │                                                     lock, clear        │
//! │                                                                         │
//! │  NOTE: The lock is never held across an `.await`.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use forkful_core::CartStore;

/// Session-managed cart state.
///
/// Cloning shares the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartStore>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        // Cart operations cannot leave the store half-updated, so a panic
        // in another holder doesn't invalidate the data.
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(line));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forkful_core::{CartLine, Money};

    fn line(id: &str, restaurant: &str, cents: i64) -> CartLine {
        CartLine::new(id, restaurant, restaurant, format!("Dish {id}"), Money::from_cents(cents), 1)
            .unwrap()
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add_item(line("A", "R1", 1000)));
        other.with_cart_mut(|c| c.add_item(line("A", "R1", 1000)));

        assert_eq!(state.with_cart(|c| c.item_count()), 2);
        assert_eq!(other.with_cart(|c| c.total()), Money::from_cents(2000));
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let state = CartState::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        state.with_cart_mut(|c| c.add_item(line("A", "R1", 100)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(state.with_cart(|c| c.item_count()), 200);
        assert_eq!(state.with_cart(|c| c.line_count()), 1);
    }
}
