//! # Catalog Commands
//!
//! Browsing restaurants and their menus.
//!
//! ## Browse Flow
//! ```text
//! Home screen ──► list_restaurants()            (best rated first)
//!      │
//!      ├── search box ──► search_restaurants("thai")
//!      ├── chips ───────► filter_restaurants({ cuisineType: "Thai" })
//!      │
//!      ▼
//! Restaurant screen ──► get_restaurant(id) → menu grouped by category
//!      │
//!      ▼
//! Tap a dish ──► add_menu_item_to_cart(item_id)   (cart.rs)
//! ```

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use forkful_core::validation::validate_search_term;
use forkful_core::{Restaurant, RestaurantFilter, RestaurantWithMenu};

/// Lists every restaurant, best rated first.
pub async fn list_restaurants(db: &DbState) -> Result<Vec<Restaurant>, ApiError> {
    debug!("list_restaurants command");
    Ok(db.inner().restaurants().list().await?)
}

/// Gets a restaurant with its menu, ordered by category.
pub async fn get_restaurant(db: &DbState, id: &str) -> Result<RestaurantWithMenu, ApiError> {
    debug!(id = %id, "get_restaurant command");
    Ok(db.inner().restaurants().get_with_menu(id).await?)
}

/// Lists restaurants matching the filter, best rated first.
///
/// ## Errors
/// `VALIDATION_ERROR` when `min_rating` is outside 0 to 5.
pub async fn filter_restaurants(
    db: &DbState,
    filter: &RestaurantFilter,
) -> Result<Vec<Restaurant>, ApiError> {
    debug!(?filter, "filter_restaurants command");

    if let Some(min_rating) = filter.min_rating {
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(ApiError::validation("min_rating must be between 0 and 5"));
        }
    }

    Ok(db.inner().restaurants().filter(filter).await?)
}

/// Searches restaurant name, chain name and cuisine, ignoring case.
///
/// ## Arguments
/// * `term` - Up to 100 characters; blank returns the whole catalog
pub async fn search_restaurants(db: &DbState, term: &str) -> Result<Vec<Restaurant>, ApiError> {
    let term = validate_search_term(term)?;
    debug!(term = %term, "search_restaurants command");

    Ok(db.inner().restaurants().search(&term).await?)
}
