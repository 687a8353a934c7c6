//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE (checkout)                                                  │
//! │     └── insert()             → one order, status pending               │
//! │     └── insert_many_atomic() → all groups in one transaction           │
//! │                                                                         │
//! │  2. PROGRESS                                                           │
//! │     └── update_status() → checked against OrderStatus::transition_to   │
//! │         pending → confirmed → preparing → ready → delivered            │
//! │                                                                         │
//! │  3. (OPTIONAL) CANCEL                                                  │
//! │     └── update_status(Cancelled) from pending or confirmed only        │
//! │                                                                         │
//! │  4. HISTORY                                                            │
//! │     └── list_for_user() → newest first                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The item list is frozen at checkout and stored as a JSON array in the
//! `items` column.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forkful_core::{Money, NewOrder, Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, user_id, restaurant_id, restaurant_name, items, \
     total_amount_cents, status, address_id, created_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    restaurant_id: String,
    restaurant_name: String,
    items: String,
    total_amount_cents: i64,
    status: OrderStatus,
    address_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)?;

        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            restaurant_id: row.restaurant_id,
            restaurant_name: row.restaurant_name,
            items,
            total_amount: Money::from_cents(row.total_amount_cents),
            status: row.status,
            address_id: row.address_id,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists one order and returns it with its generated id.
    pub async fn insert(&self, order: &NewOrder) -> DbResult<Order> {
        let stored = insert_order_row(&self.pool, order).await?;

        info!(
            id = %stored.id,
            restaurant = %stored.restaurant_name,
            total = %stored.total_amount,
            "Order created"
        );
        Ok(stored)
    }

    /// Persists several orders in one transaction.
    ///
    /// ## Returns
    /// * `Ok(orders)` - Every order was written, in input order
    /// * `Err(_)` - Nothing was written
    pub async fn insert_many_atomic(&self, orders: &[NewOrder]) -> DbResult<Vec<Order>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut stored = Vec::with_capacity(orders.len());
        for order in orders {
            // Dropping `tx` on error rolls everything back.
            stored.push(insert_order_row(&mut *tx, order).await?);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = stored.len(), "Orders created atomically");
        Ok(stored)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Lists a user's orders, newest first.
    ///
    /// Orders from the same checkout share a timestamp and come back in
    /// reverse insertion order.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        );

        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = %user_id, count = rows.len(), "Listed orders");
        rows.into_iter().map(Order::try_from).collect()
    }

    /// Moves an order to a new status.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Unknown order
    /// * `DbError::Rule(CoreError::InvalidStatusTransition)` - Transition
    ///   not allowed from the current status
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> DbResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or_else(|| DbError::not_found("Order", id))?;
        let next = current.transition_to(next)?;

        sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(next)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, from = %current, to = %next, "Order status updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Number of orders a user has placed.
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

async fn insert_order_row<'e, E>(executor: E, order: &NewOrder) -> DbResult<Order>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id = Uuid::new_v4().to_string();
    let items = serde_json::to_string(&order.items)?;

    debug!(id = %id, restaurant_id = %order.restaurant_id, "Inserting order");

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, user_id, restaurant_id, restaurant_name, items,
            total_amount_cents, status, address_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&id)
    .bind(&order.user_id)
    .bind(&order.restaurant_id)
    .bind(&order.restaurant_name)
    .bind(items)
    .bind(order.total_amount.cents())
    .bind(order.status)
    .bind(&order.address_id)
    .bind(order.created_at)
    .execute(executor)
    .await?;

    Ok(Order::from_new(id, order.clone()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use forkful_core::CoreError;

    fn new_order(restaurant: &str, cents: i64, created_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            user_id: "u-1".to_string(),
            restaurant_id: format!("r-{restaurant}"),
            restaurant_name: restaurant.to_string(),
            items: vec![OrderItem {
                item_id: "m-1".to_string(),
                name: "Pad Thai".to_string(),
                unit_price: Money::from_cents(cents),
                quantity: 1,
            }],
            total_amount: Money::from_cents(cents),
            status: OrderStatus::Pending,
            address_id: "addr-1".to_string(),
            created_at,
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let repo = db.orders();

        let created = repo.insert(&new_order("Thai Spice Garden", 1899, Utc::now())).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.items[0].unit_price, Money::from_cents(1899));
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = db().await;
        let repo = db.orders();
        let now = Utc::now();

        repo.insert(&new_order("Older", 1000, now - Duration::hours(1))).await.unwrap();
        repo.insert(&new_order("Newer", 1000, now)).await.unwrap();

        let mut other_user = new_order("Elsewhere", 1000, now);
        other_user.user_id = "u-2".to_string();
        repo.insert(&other_user).await.unwrap();

        let orders = repo.list_for_user("u-1").await.unwrap();
        let names: Vec<&str> = orders.iter().map(|o| o.restaurant_name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(repo.count_for_user("u-1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_atomic_insert_is_all_or_nothing() {
        let db = db().await;
        let repo = db.orders();
        let now = Utc::now();

        let good = new_order("Burger House", 2000, now);
        // Violates the non-negative total CHECK.
        let bad = new_order("Thai Spice Garden", -1, now);

        let err = repo.insert_many_atomic(&[good.clone(), bad]).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
        assert_eq!(repo.count_for_user("u-1").await.unwrap(), 0);

        let stored = repo
            .insert_many_atomic(&[good.clone(), new_order("Dim Sum Palace", 1500, now)])
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].restaurant_name, "Burger House");
        assert_eq!(repo.count_for_user("u-1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = db().await;
        let repo = db.orders();
        let order = repo.insert(&new_order("Burger House", 1299, Utc::now())).await.unwrap();

        let confirmed = repo.update_status(&order.id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let err = repo
            .update_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidStatusTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Delivered
            })
        ));

        let cancelled = repo.update_status(&order.id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(repo.update_status(&order.id, OrderStatus::Pending).await.is_err());

        let err = repo
            .update_status("missing", OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
