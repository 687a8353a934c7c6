//! # Profile Repository
//!
//! One profile row per user, keyed by the user id.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use forkful_core::{Profile, ProfileUpdate};

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    full_name: Option<String>,
    phone_number: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name,
            phone_number: row.phone_number,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user profiles.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets a user's profile, if one was ever saved.
    pub async fn get(&self, user_id: &str) -> DbResult<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT id, full_name, phone_number, updated_at FROM profiles WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    /// Creates or replaces a user's profile.
    ///
    /// Fields are trimmed; blank fields are stored as NULL.
    pub async fn upsert(&self, user_id: &str, update: &ProfileUpdate) -> DbResult<Profile> {
        let profile = Profile {
            id: user_id.to_string(),
            full_name: normalize(update.full_name.as_deref()),
            phone_number: normalize(update.phone_number.as_deref()),
            updated_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO profiles (id, full_name, phone_number, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (id) DO UPDATE SET
                full_name = excluded.full_name,
                phone_number = excluded.phone_number,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.full_name)
        .bind(&profile.phone_number)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        info!(user_id = %user_id, "Profile saved");
        Ok(profile)
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.profiles();

        assert!(repo.get("u-1").await.unwrap().is_none());

        let saved = repo
            .upsert(
                "u-1",
                &ProfileUpdate {
                    full_name: Some("  Ada Lovelace ".to_string()),
                    phone_number: Some("+1 555 0100".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.full_name.as_deref(), Some("Ada Lovelace"));

        let updated = repo
            .upsert(
                "u-1",
                &ProfileUpdate {
                    full_name: Some("Ada King".to_string()),
                    phone_number: Some("   ".to_string()),
                },
            )
            .await
            .unwrap();

        let fetched = repo.get("u-1").await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.full_name.as_deref(), Some("Ada King"));
        assert_eq!(fetched.phone_number, None);
    }
}
