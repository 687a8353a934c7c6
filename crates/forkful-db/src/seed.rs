//! # Sample Catalog
//!
//! The restaurants and menus used for local development and tests.
//! Prices are written as decimal text and parsed exactly into cents.
//!
//! Used by the `seed` binary and by the client when `FORKFUL_SEED` is set.

use std::str::FromStr;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use forkful_core::{MenuItem, Money, Restaurant, RestaurantWithMenu};

struct SeedRestaurant {
    name: &'static str,
    chain_name: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
    cuisine_type: &'static str,
    segment: &'static str,
    city: &'static str,
    area: &'static str,
    rating: f64,
    cover_image: &'static str,
    delivery_time: &'static str,
    minimum_order: &'static str,
    menu: &'static [SeedMenuItem],
}

struct SeedMenuItem {
    label: &'static str,
    description: &'static str,
    price: &'static str,
    category: &'static str,
}

const fn item(
    label: &'static str,
    description: &'static str,
    price: &'static str,
    category: &'static str,
) -> SeedMenuItem {
    SeedMenuItem {
        label,
        description,
        price,
        category,
    }
}

const CATALOG: &[SeedRestaurant] = &[
    SeedRestaurant {
        name: "Burger House",
        chain_name: "Burger Chain",
        address: "123 Main St, New York, NY 10001",
        latitude: 40.7128,
        longitude: -74.0060,
        cuisine_type: "American",
        segment: "Casual Dining",
        city: "New York",
        area: "Manhattan",
        rating: 4.5,
        cover_image: "https://images.unsplash.com/photo-1571091718767-18b5b1457add?w=800",
        delivery_time: "25-35",
        minimum_order: "15",
        menu: &[
            item("Classic Burger", "100% Angus beef patty with lettuce, tomato, and special sauce", "12.99", "Burgers"),
            item("Cheese Fries", "Crispy fries topped with melted cheddar", "6.99", "Sides"),
            item("Milkshake", "Creamy vanilla milkshake", "5.99", "Drinks"),
        ],
    },
    SeedRestaurant {
        name: "Thai Spice Garden",
        chain_name: "Thai Spice",
        address: "567 Park Ave, New York, NY 10065",
        latitude: 40.7681,
        longitude: -73.9649,
        cuisine_type: "Thai",
        segment: "Fine Dining",
        city: "New York",
        area: "Upper East Side",
        rating: 4.7,
        cover_image: "https://images.unsplash.com/photo-1559314809-0d155014e29e?w=800",
        delivery_time: "35-45",
        minimum_order: "25",
        menu: &[
            item("Pad Thai", "Rice noodles with shrimp, tofu, eggs, and peanuts in tamarind sauce", "18.99", "Noodles"),
            item("Green Curry", "Coconut curry with bamboo shoots, eggplant, and choice of protein", "19.99", "Curries"),
            item("Spring Rolls", "Crispy vegetable spring rolls with sweet chili sauce", "8.99", "Appetizers"),
            item("Mango Sticky Rice", "Sweet coconut sticky rice with fresh mango", "9.99", "Desserts"),
            item("Thai Iced Tea", "Traditional sweet and creamy Thai tea", "4.99", "Beverages"),
        ],
    },
    SeedRestaurant {
        name: "Mediterranean Mezze",
        chain_name: "Mezze Group",
        address: "789 Columbus Ave, New York, NY 10025",
        latitude: 40.7891,
        longitude: -73.9667,
        cuisine_type: "Mediterranean",
        segment: "Casual Dining",
        city: "New York",
        area: "Upper West Side",
        rating: 4.6,
        cover_image: "https://images.unsplash.com/photo-1511690656952-34342bb7c2f2?w=800",
        delivery_time: "30-40",
        minimum_order: "20",
        menu: &[
            item("Hummus Platter", "Creamy hummus with olive oil, paprika, and warm pita", "12.99", "Appetizers"),
            item("Falafel Wrap", "Crispy falafel with tahini sauce and fresh vegetables", "14.99", "Wraps"),
            item("Shawarma Plate", "Marinated chicken or lamb with rice and salad", "21.99", "Entrees"),
            item("Greek Salad", "Fresh vegetables with feta cheese and olives", "15.99", "Salads"),
            item("Baklava", "Sweet layered pastry with nuts and honey", "7.99", "Desserts"),
        ],
    },
    SeedRestaurant {
        name: "Indian Curry House",
        chain_name: "Curry House Group",
        address: "234 Lexington Ave, New York, NY 10016",
        latitude: 40.7446,
        longitude: -73.9784,
        cuisine_type: "Indian",
        segment: "Fine Dining",
        city: "New York",
        area: "Murray Hill",
        rating: 4.8,
        cover_image: "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=800",
        delivery_time: "40-50",
        minimum_order: "30",
        menu: &[
            item("Butter Chicken", "Tender chicken in rich tomato-butter sauce", "22.99", "Main Course"),
            item("Vegetable Biryani", "Aromatic rice with mixed vegetables and spices", "19.99", "Rice"),
            item("Garlic Naan", "Fresh bread with garlic and butter", "4.99", "Breads"),
            item("Samosa", "Crispy pastry filled with spiced potatoes and peas", "6.99", "Appetizers"),
            item("Mango Lassi", "Yogurt smoothie with mango and cardamom", "5.99", "Beverages"),
        ],
    },
    SeedRestaurant {
        name: "Dim Sum Palace",
        chain_name: "Palace Group",
        address: "345 Canal St, New York, NY 10013",
        latitude: 40.7196,
        longitude: -74.0044,
        cuisine_type: "Chinese",
        segment: "Casual Dining",
        city: "New York",
        area: "Chinatown",
        rating: 4.5,
        cover_image: "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=800",
        delivery_time: "30-40",
        minimum_order: "25",
        menu: &[
            item("Har Gow", "Shrimp dumplings in translucent wrapper", "8.99", "Dumplings"),
            item("Siu Mai", "Pork and shrimp dumplings", "7.99", "Dumplings"),
            item("BBQ Pork Buns", "Steamed buns filled with char siu pork", "6.99", "Buns"),
            item("Egg Tarts", "Flaky pastry with sweet egg custard", "5.99", "Desserts"),
            item("Jasmine Tea", "Premium Chinese jasmine tea", "3.99", "Beverages"),
        ],
    },
    SeedRestaurant {
        name: "Korean BBQ House",
        chain_name: "K-BBQ Group",
        address: "456 32nd St, New York, NY 10001",
        latitude: 40.7484,
        longitude: -73.9857,
        cuisine_type: "Korean",
        segment: "Casual Dining",
        city: "New York",
        area: "Koreatown",
        rating: 4.7,
        cover_image: "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=800",
        delivery_time: "35-45",
        minimum_order: "30",
        menu: &[
            item("Bulgogi", "Marinated beef with rice and banchan", "24.99", "BBQ"),
            item("Kimchi Stew", "Spicy stew with kimchi and pork", "18.99", "Stews"),
            item("Bibimbap", "Rice bowl with vegetables and egg", "16.99", "Rice Dishes"),
            item("Korean Fried Chicken", "Crispy chicken with sweet and spicy sauce", "19.99", "Chicken"),
            item("Soju", "Traditional Korean rice liquor", "12.99", "Beverages"),
        ],
    },
];

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog already had restaurants; nothing was written.
    Skipped { existing: i64 },
    Seeded { restaurants: usize, menu_items: usize },
}

/// Builds the sample catalog with fresh ids.
pub fn sample_catalog() -> DbResult<Vec<RestaurantWithMenu>> {
    let now = Utc::now();

    CATALOG
        .iter()
        .map(|seed| {
            let restaurant = Restaurant {
                id: Uuid::new_v4().to_string(),
                name: seed.name.to_string(),
                chain_name: seed.chain_name.to_string(),
                address: seed.address.to_string(),
                latitude: seed.latitude,
                longitude: seed.longitude,
                cuisine_type: seed.cuisine_type.to_string(),
                segment: seed.segment.to_string(),
                city: seed.city.to_string(),
                area: seed.area.to_string(),
                rating: seed.rating,
                cover_image: seed.cover_image.to_string(),
                delivery_time: seed.delivery_time.to_string(),
                minimum_order: parse_price(seed.minimum_order)?,
                created_at: now,
            };

            let menu_items = seed
                .menu
                .iter()
                .map(|m| {
                    Ok(MenuItem {
                        id: Uuid::new_v4().to_string(),
                        restaurant_id: restaurant.id.clone(),
                        label: m.label.to_string(),
                        description: m.description.to_string(),
                        price: parse_price(m.price)?,
                        image: String::new(),
                        category: m.category.to_string(),
                        created_at: now,
                    })
                })
                .collect::<DbResult<Vec<_>>>()?;

            Ok(RestaurantWithMenu {
                restaurant,
                menu_items,
            })
        })
        .collect()
}

/// Seeds the sample catalog unless restaurants already exist.
pub async fn seed_catalog(db: &Database) -> DbResult<SeedOutcome> {
    let existing = db.restaurants().count().await?;
    if existing > 0 {
        info!(existing, "Catalog already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let catalog = sample_catalog()?;
    db.restaurants().insert_catalog(&catalog).await?;

    let menu_items = catalog.iter().map(|r| r.menu_items.len()).sum();
    info!(restaurants = catalog.len(), menu_items, "Catalog seeded");

    Ok(SeedOutcome::Seeded {
        restaurants: catalog.len(),
        menu_items,
    })
}

fn parse_price(text: &str) -> DbResult<Money> {
    Money::from_str(text).map_err(|e| DbError::corrupt("price", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[test]
    fn test_sample_catalog_prices_are_exact() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(catalog.len(), 6);

        let burger = &catalog[0];
        assert_eq!(burger.restaurant.minimum_order, Money::from_cents(1500));
        assert_eq!(burger.menu_items[0].price, Money::from_cents(1299));
        assert!(burger
            .menu_items
            .iter()
            .all(|m| m.restaurant_id == burger.restaurant.id));
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_populated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = seed_catalog(&db).await.unwrap();
        assert_eq!(
            first,
            SeedOutcome::Seeded {
                restaurants: 6,
                menu_items: 28
            }
        );

        let second = seed_catalog(&db).await.unwrap();
        assert_eq!(second, SeedOutcome::Skipped { existing: 6 });
        assert_eq!(db.restaurants().count().await.unwrap(), 6);
    }
}
