//! # forkful-core: Pure Business Logic for Forkful
//!
//! This crate is the **heart** of the Forkful ordering client. It contains the
//! cart, the checkout planning and the domain types as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forkful Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Frontend                              │   │
//! │  │   Restaurants ──► Menu ──► Cart ──► Checkout ──► Orders        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    forkful-client commands                      │   │
//! │  │    add_to_cart, remove_from_cart, place_order, list_orders     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ forkful-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money  │ │   cart   │ │ checkout         │  │   │
//! │  │   │ Order    │ │  Money  │ │CartStore │ │ plan_orders      │  │   │
//! │  │   │ Address  │ │         │ │ CartLine │ │ DeliveryChoice   │  │   │
//! │  │   └──────────┘ └─────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    forkful-db (Storage Layer)                   │   │
//! │  │        restaurants, menu items, orders, addresses, profiles     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Restaurant, MenuItem, Order, Address, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The in-memory cart store and per-restaurant grouping
//! - [`checkout`] - Turning a cart into one order per restaurant
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use forkful_core::cart::{CartLine, CartStore};
//! use forkful_core::money::Money;
//!
//! let mut cart = CartStore::new();
//! let burger = CartLine::new("item-1", "r-1", "Burger House", "Classic Burger", Money::from_cents(1299), 1).unwrap();
//!
//! cart.add_item(burger.clone());
//! cart.add_item(burger);
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().cents(), 2598);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLine, CartStore, CartTotals, RestaurantGroup};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity a single cart line can be created with.
///
/// ## Business Reason
/// Prevents accidental over-ordering from a quantity picker
/// (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Highest accepted unit price, in cents ($100,000.00).
///
/// Keeps `price × MAX_ITEM_QUANTITY` far inside the `i64` range.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Longest accepted restaurant search term.
pub const MAX_SEARCH_TERM_LEN: usize = 100;
