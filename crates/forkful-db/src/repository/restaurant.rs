//! # Restaurant Repository
//!
//! Catalog reads (restaurants and their menus) plus the inserts used by
//! seeding.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Restaurant Search Works                          │
//! │                                                                         │
//! │  User types: "THAI"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  trim, escape LIKE wildcards, wrap: "%THAI%"                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE (ASCII case-insensitive) over: name, chain_name, cuisine_type    │
//! │                                                                         │
//! │  Thai Spice Garden | Thai Spice | Thai     ← MATCH (name)              │
//! │  Burger House      | Burger ... | American                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results ordered by rating DESC, name                                  │
//! │                                                                         │
//! │  Blank term → the full catalog                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use forkful_core::{MenuItem, Money, Restaurant, RestaurantFilter, RestaurantWithMenu};

const RESTAURANT_COLUMNS: &str = "id, name, chain_name, address, latitude, longitude, \
     cuisine_type, segment, city, area, rating, cover_image, delivery_time, \
     minimum_order_cents, created_at";

const MENU_ITEM_COLUMNS: &str =
    "id, restaurant_id, label, description, price_cents, image, category, created_at";

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct RestaurantRow {
    id: String,
    name: String,
    chain_name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    cuisine_type: String,
    segment: String,
    city: String,
    area: String,
    rating: f64,
    cover_image: String,
    delivery_time: String,
    minimum_order_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            chain_name: row.chain_name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            cuisine_type: row.cuisine_type,
            segment: row.segment,
            city: row.city,
            area: row.area,
            rating: row.rating,
            cover_image: row.cover_image,
            delivery_time: row.delivery_time,
            minimum_order: Money::from_cents(row.minimum_order_cents),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    restaurant_id: String,
    label: String,
    description: String,
    price_cents: i64,
    image: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            restaurant_id: row.restaurant_id,
            label: row.label,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            image: row.image,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the restaurant catalog.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.restaurants();
///
/// let all = repo.list().await?;
/// let thai = repo.search("thai").await?;
/// let detail = repo.get_with_menu(&all[0].id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    /// Creates a new RestaurantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantRepository { pool }
    }

    /// Lists every restaurant, best rated first (ties by name).
    pub async fn list(&self) -> DbResult<Vec<Restaurant>> {
        let sql = format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY rating DESC, name ASC"
        );

        let rows: Vec<RestaurantRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed restaurants");
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    /// Gets a restaurant by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Restaurant))` - Restaurant found
    /// * `Ok(None)` - Restaurant not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Restaurant>> {
        let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?1");

        let row: Option<RestaurantRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Restaurant::from))
    }

    /// Gets a restaurant together with its menu, ordered by category.
    ///
    /// Items inside a category keep their insertion order.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the restaurant doesn't exist.
    pub async fn get_with_menu(&self, id: &str) -> DbResult<RestaurantWithMenu> {
        let restaurant = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Restaurant", id))?;

        let menu_items = self.menu(id).await?;

        debug!(id = %id, items = menu_items.len(), "Loaded restaurant menu");
        Ok(RestaurantWithMenu {
            restaurant,
            menu_items,
        })
    }

    /// Lists a restaurant's menu items, ordered by category.
    pub async fn menu(&self, restaurant_id: &str) -> DbResult<Vec<MenuItem>> {
        let sql = format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items \
             WHERE restaurant_id = ?1 ORDER BY category ASC, rowid ASC"
        );

        let rows: Vec<MenuItemRow> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Gets a single menu item by its ID.
    pub async fn get_menu_item(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let sql = format!("SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = ?1");

        let row: Option<MenuItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Lists restaurants matching every set field of the filter.
    ///
    /// Text fields compare case-insensitively; `min_rating` is inclusive.
    /// An empty filter returns the whole catalog.
    pub async fn filter(&self, filter: &RestaurantFilter) -> DbResult<Vec<Restaurant>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE 1 = 1"));

        let text_filters = [
            ("cuisine_type", &filter.cuisine_type),
            ("segment", &filter.segment),
            ("city", &filter.city),
            ("area", &filter.area),
        ];

        for (column, value) in text_filters {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query
                    .push(format!(" AND {column} = "))
                    .push_bind(value.to_string())
                    .push(" COLLATE NOCASE");
            }
        }

        if let Some(min_rating) = filter.min_rating {
            query.push(" AND rating >= ").push_bind(min_rating);
        }

        query.push(" ORDER BY rating DESC, name ASC");

        let rows: Vec<RestaurantRow> = query.build_query_as().fetch_all(&self.pool).await?;

        debug!(?filter, count = rows.len(), "Filtered restaurants");
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    /// Case-insensitive substring search over name, chain name and cuisine.
    ///
    /// ## Arguments
    /// * `term` - Search text; blank returns the full catalog
    pub async fn search(&self, term: &str) -> DbResult<Vec<Restaurant>> {
        let term = term.trim();

        if term.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", escape_like(term));
        let sql = format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants \
             WHERE name LIKE ?1 ESCAPE '\\' \
                OR chain_name LIKE ?1 ESCAPE '\\' \
                OR cuisine_type LIKE ?1 ESCAPE '\\' \
             ORDER BY rating DESC, name ASC"
        );

        let rows: Vec<RestaurantRow> = sqlx::query_as(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(term = %term, count = rows.len(), "Search returned restaurants");
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    /// Number of restaurants in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a single restaurant (without menu).
    pub async fn insert_restaurant(&self, restaurant: &Restaurant) -> DbResult<()> {
        debug!(id = %restaurant.id, name = %restaurant.name, "Inserting restaurant");
        insert_restaurant_row(&self.pool, restaurant).await
    }

    /// Inserts a single menu item. The restaurant must already exist.
    pub async fn insert_menu_item(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, label = %item.label, "Inserting menu item");
        insert_menu_item_row(&self.pool, item).await
    }

    /// Inserts restaurants with their menus in one transaction.
    ///
    /// Either the whole catalog lands or nothing does.
    pub async fn insert_catalog(&self, catalog: &[RestaurantWithMenu]) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for entry in catalog {
            insert_restaurant_row(&mut *tx, &entry.restaurant).await?;
            for item in &entry.menu_items {
                insert_menu_item_row(&mut *tx, item).await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(restaurants = catalog.len(), "Catalog inserted");
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn insert_restaurant_row<'e, E>(executor: E, r: &Restaurant) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO restaurants (
            id, name, chain_name, address, latitude, longitude,
            cuisine_type, segment, city, area, rating, cover_image,
            delivery_time, minimum_order_cents, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10, ?11, ?12,
            ?13, ?14, ?15
        )
        "#,
    )
    .bind(&r.id)
    .bind(&r.name)
    .bind(&r.chain_name)
    .bind(&r.address)
    .bind(r.latitude)
    .bind(r.longitude)
    .bind(&r.cuisine_type)
    .bind(&r.segment)
    .bind(&r.city)
    .bind(&r.area)
    .bind(r.rating)
    .bind(&r.cover_image)
    .bind(&r.delivery_time)
    .bind(r.minimum_order.cents())
    .bind(r.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

async fn insert_menu_item_row<'e, E>(executor: E, item: &MenuItem) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO menu_items (
            id, restaurant_id, label, description, price_cents, image, category, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&item.id)
    .bind(&item.restaurant_id)
    .bind(&item.label)
    .bind(&item.description)
    .bind(item.price.cents())
    .bind(&item.image)
    .bind(&item.category)
    .bind(item.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Escapes `%`, `_` and the escape character itself for a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::seed;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed::seed_catalog(&db).await.unwrap();
        db
    }

    fn names(restaurants: &[Restaurant]) -> Vec<&str> {
        restaurants.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("thai"), "thai");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_list_orders_by_rating() {
        let db = seeded().await;
        let restaurants = db.restaurants().list().await.unwrap();

        assert_eq!(restaurants.len(), 6);
        assert_eq!(restaurants[0].name, "Indian Curry House");
        assert!(restaurants.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[tokio::test]
    async fn test_get_with_menu() {
        let db = seeded().await;
        let repo = db.restaurants();
        let burger = repo
            .search("burger house")
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap();

        let detail = repo.get_with_menu(&burger.id).await.unwrap();
        assert_eq!(detail.restaurant.minimum_order, Money::from_cents(1500));
        assert_eq!(detail.menu_items.len(), 3);

        let categories: Vec<&str> = detail.menu_items.iter().map(|m| m.category.as_str()).collect();
        assert_eq!(categories, vec!["Burgers", "Drinks", "Sides"]);

        let classic = &detail.menu_items[0];
        assert_eq!(classic.label, "Classic Burger");
        assert_eq!(classic.price, Money::from_cents(1299));

        let fetched = repo.get_menu_item(&classic.id).await.unwrap().unwrap();
        assert_eq!(&fetched, classic);
    }

    #[tokio::test]
    async fn test_get_with_menu_not_found() {
        let db = seeded().await;
        let err = db.restaurants().get_with_menu("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(db.restaurants().get_menu_item("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let db = seeded().await;
        let repo = db.restaurants();

        assert_eq!(names(&repo.search("THAI").await.unwrap()), vec!["Thai Spice Garden"]);
        // chain name
        assert_eq!(names(&repo.search("k-bbq").await.unwrap()), vec!["Korean BBQ House"]);
        // cuisine type
        assert_eq!(names(&repo.search("mediterranean").await.unwrap()), vec!["Mediterranean Mezze"]);

        assert_eq!(repo.search("   ").await.unwrap().len(), 6);
        assert!(repo.search("%").await.unwrap().is_empty());
        assert!(repo.search("sushi").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter() {
        let db = seeded().await;
        let repo = db.restaurants();

        let casual = repo
            .filter(&RestaurantFilter {
                segment: Some("casual dining".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(casual.len(), 4);
        assert!(casual.iter().all(|r| r.segment == "Casual Dining"));

        let top = repo
            .filter(&RestaurantFilter {
                min_rating: Some(4.7),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            names(&top),
            vec!["Indian Curry House", "Korean BBQ House", "Thai Spice Garden"]
        );

        let combined = repo
            .filter(&RestaurantFilter {
                segment: Some("Fine Dining".to_string()),
                area: Some("Murray Hill".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(names(&combined), vec!["Indian Curry House"]);

        assert_eq!(repo.filter(&RestaurantFilter::default()).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_menu_item_requires_restaurant() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = MenuItem {
            id: "m-1".to_string(),
            restaurant_id: "nope".to_string(),
            label: "Orphan".to_string(),
            description: String::new(),
            price: Money::from_cents(100),
            image: String::new(),
            category: "Misc".to_string(),
            created_at: Utc::now(),
        };

        let err = db.restaurants().insert_menu_item(&item).await.unwrap_err();
        assert!(matches!(err, DbError::MissingReference(_)));
    }
}
