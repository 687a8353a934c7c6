//! # Profile Commands

use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use forkful_core::validation::validate_profile_update;
use forkful_core::{Profile, ProfileUpdate};

/// Gets the session user's profile.
///
/// ## Errors
/// `NOT_FOUND` until the profile has been saved once.
pub async fn get_profile(db: &DbState, config: &ConfigState) -> Result<Profile, ApiError> {
    debug!(user_id = %config.user_id, "get_profile command");

    db.inner()
        .profiles()
        .get(&config.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile", &config.user_id))
}

/// Creates or updates the session user's profile.
pub async fn update_profile(
    db: &DbState,
    config: &ConfigState,
    update: &ProfileUpdate,
) -> Result<Profile, ApiError> {
    debug!(user_id = %config.user_id, "update_profile command");

    validate_profile_update(update)?;
    Ok(db.inner().profiles().upsert(&config.user_id, update).await?)
}
