//! # Address Repository
//!
//! Saved delivery addresses, scoped by user.
//!
//! ## Default Address Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  At most one default per user, and exactly one once any exist.         │
//! │                                                                         │
//! │  insert()       → first address of a user becomes the default          │
//! │  set_default()  → one transaction:                                     │
//! │                   1. clear is_default for all the user's addresses     │
//! │                   2. set is_default on the chosen one                  │
//! │                   (unknown id → rollback, NotFound)                    │
//! │  delete()       → removing the default promotes the oldest remaining  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forkful_core::{Address, NewAddress};

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: String,
    user_id: String,
    address_line1: String,
    address_line2: Option<String>,
    city: String,
    state: String,
    postal_code: String,
    is_default: bool,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            user_id: row.user_id,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            is_default: row.is_default,
        }
    }
}

/// Repository for delivery addresses.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Lists a user's addresses, default first, then oldest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Address>> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, address_line1, address_line2, city, state, postal_code, is_default
            FROM addresses
            WHERE user_id = ?1
            ORDER BY is_default DESC, created_at ASC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = rows.len(), "Listed addresses");
        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Gets one of a user's addresses.
    pub async fn get(&self, user_id: &str, id: &str) -> DbResult<Option<Address>> {
        let row: Option<AddressRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, address_line1, address_line2, city, state, postal_code, is_default
            FROM addresses
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Finds a saved address with the same fields as `address`.
    ///
    /// Fields are compared the way `insert` stores them: trimmed, with a
    /// blank second line matching NULL.
    pub async fn find_same(&self, user_id: &str, address: &NewAddress) -> DbResult<Option<Address>> {
        let row: Option<AddressRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, address_line1, address_line2, city, state, postal_code, is_default
            FROM addresses
            WHERE user_id = ?1
              AND address_line1 = ?2
              AND address_line2 IS ?3
              AND city = ?4
              AND state = ?5
              AND postal_code = ?6
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(address.address_line1.trim())
        .bind(second_line(address))
        .bind(address.city.trim())
        .bind(address.state.trim())
        .bind(address.postal_code.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Saves a new address for a user.
    ///
    /// Fields are stored trimmed; a blank second line is stored as NULL.
    /// The user's first address becomes the default. Callers validate
    /// with `forkful_core::validation::validate_new_address` first.
    pub async fn insert(&self, user_id: &str, address: &NewAddress) -> DbResult<Address> {
        let id = Uuid::new_v4().to_string();
        let line2 = second_line(address);

        // The NOT EXISTS subquery makes the first address the default
        // within the same statement.
        sqlx::query(
            r#"
            INSERT INTO addresses (
                id, user_id, address_line1, address_line2, city, state, postal_code,
                is_default, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                NOT EXISTS (SELECT 1 FROM addresses WHERE user_id = ?2),
                ?8
            )
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(address.address_line1.trim())
        .bind(&line2)
        .bind(address.city.trim())
        .bind(address.state.trim())
        .bind(address.postal_code.trim())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let saved = self
            .get(user_id, &id)
            .await?
            .ok_or_else(|| DbError::not_found("Address", &id))?;

        info!(id = %saved.id, is_default = saved.is_default, "Address saved");
        Ok(saved)
    }

    /// Makes `id` the user's only default address.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the address doesn't belong to the user;
    /// the previous default is left untouched.
    pub async fn set_default(&self, user_id: &str, id: &str) -> DbResult<Address> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("UPDATE addresses SET is_default = 0 WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let updated = sqlx::query("UPDATE addresses SET is_default = 1 WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Err(DbError::not_found("Address", id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, "Default address changed");

        self.get(user_id, id)
            .await?
            .ok_or_else(|| DbError::not_found("Address", id))
    }

    /// Deletes one of a user's addresses.
    ///
    /// Deleting the default promotes the user's oldest remaining address.
    /// Orders keep their `address_id`; history is not rewritten.
    pub async fn delete(&self, user_id: &str, id: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let was_default: Option<bool> =
            sqlx::query_scalar("SELECT is_default FROM addresses WHERE id = ?1 AND user_id = ?2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let was_default = was_default.ok_or_else(|| DbError::not_found("Address", id))?;

        sqlx::query("DELETE FROM addresses WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if was_default {
            sqlx::query(
                r#"
                UPDATE addresses SET is_default = 1
                WHERE id = (
                    SELECT id FROM addresses WHERE user_id = ?1
                    ORDER BY created_at ASC, rowid ASC LIMIT 1
                )
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, was_default, "Address deleted");
        Ok(())
    }
}

fn second_line(address: &NewAddress) -> Option<String> {
    address
        .address_line2
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_address(line1: &str) -> NewAddress {
        NewAddress {
            address_line1: line1.to_string(),
            address_line2: Some("  ".to_string()),
            city: "New York".to_string(),
            state: "NY".to_string(),
            postal_code: "10001".to_string(),
        }
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn defaults(addresses: &[Address]) -> usize {
        addresses.iter().filter(|a| a.is_default).count()
    }

    #[tokio::test]
    async fn test_first_address_becomes_default() {
        let db = db().await;
        let repo = db.addresses();

        let first = repo.insert("u-1", &new_address(" 1 First Ave ")).await.unwrap();
        let second = repo.insert("u-1", &new_address("2 Second Ave")).await.unwrap();
        let other = repo.insert("u-2", &new_address("3 Third Ave")).await.unwrap();

        assert!(first.is_default);
        assert_eq!(first.address_line1, "1 First Ave");
        assert_eq!(first.address_line2, None);
        assert!(!second.is_default);
        assert!(other.is_default);
    }

    #[tokio::test]
    async fn test_set_default_leaves_exactly_one() {
        let db = db().await;
        let repo = db.addresses();

        repo.insert("u-1", &new_address("1 First Ave")).await.unwrap();
        let second = repo.insert("u-1", &new_address("2 Second Ave")).await.unwrap();
        repo.insert("u-1", &new_address("3 Third Ave")).await.unwrap();

        let updated = repo.set_default("u-1", &second.id).await.unwrap();
        assert!(updated.is_default);

        let all = repo.list_for_user("u-1").await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(defaults(&all), 1);
        assert_eq!(all[0].id, second.id);
    }

    #[tokio::test]
    async fn test_set_default_unknown_keeps_previous() {
        let db = db().await;
        let repo = db.addresses();

        let first = repo.insert("u-1", &new_address("1 First Ave")).await.unwrap();
        let foreign = repo.insert("u-2", &new_address("9 Other St")).await.unwrap();

        assert!(repo.set_default("u-1", "missing").await.unwrap_err().is_not_found());
        // Another user's address is not ours to pick.
        assert!(repo.set_default("u-1", &foreign.id).await.unwrap_err().is_not_found());

        let all = repo.list_for_user("u-1").await.unwrap();
        assert_eq!(defaults(&all), 1);
        assert_eq!(all[0].id, first.id);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let repo = db.addresses();

        let first = repo.insert("u-1", &new_address("1 First Ave")).await.unwrap();
        let second = repo.insert("u-1", &new_address("2 Second Ave")).await.unwrap();

        repo.delete("u-1", &first.id).await.unwrap();

        let remaining = repo.list_for_user("u-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
        assert!(remaining[0].is_default);

        assert!(repo.delete("u-1", &first.id).await.unwrap_err().is_not_found());
        assert!(repo.delete("u-2", &second.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_same_matches_stored_form() {
        let db = db().await;
        let repo = db.addresses();

        let saved = repo.insert("u-1", &new_address("1 First Ave")).await.unwrap();

        let retyped = new_address("  1 First Ave ");
        let found = repo.find_same("u-1", &retyped).await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);

        let mut with_unit = new_address("1 First Ave");
        with_unit.address_line2 = Some("Apt 2".to_string());
        assert!(repo.find_same("u-1", &with_unit).await.unwrap().is_none());
        assert!(repo.find_same("u-2", &retyped).await.unwrap().is_none());
    }
}
