//! # Commands Module
//!
//! Everything a Forkful frontend can ask the client to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Restaurant list, filter, search, menus
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── place_order, OrderGateway
//! ├── address.rs   ◄─── Saved delivery addresses
//! ├── profile.rs   ◄─── Name and phone number
//! └── order.rs     ◄─── Order history and status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Frontend                                                               │
//! │  ────────                                                               │
//! │  addMenuItemToCart("m-42")                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust client                                                            │
//! │  ───────────                                                            │
//! │  async fn add_menu_item_to_cart(                                        │
//! │      db: &DbState,        ◄── Only the state it needs                  │
//! │      cart: &CartState,                                                  │
//! │      item_id: &str,                                                     │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization, camelCase)                              │
//! │         ▼                                                               │
//! │  Frontend receives: CartResponse or { code, message }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState)
//!
//! // Needs the database and the session user
//! async fn list_orders(db: &DbState, config: &ConfigState)
//!
//! // Needs all three
//! async fn place_order(db: &DbState, cart: &CartState, config: &ConfigState, ...)
//! ```

pub mod address;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod profile;
