//! # Validation Module
//!
//! Input validation utilities for Forkful.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Client commands (Rust)                                       │
//! │  └── THIS MODULE: field rules for cart lines, addresses, profiles      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewAddress, ProfileUpdate};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_SEARCH_TERM_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ADDRESS_FIELD_LEN: usize = 200;
const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a field is present (non-blank) and not too long.
///
/// ## Example
/// ```rust
/// use forkful_core::validation::validate_required;
///
/// assert!(validate_required("city", "New York", 200).is_ok());
/// assert!(validate_required("city", "   ", 200).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a restaurant search term.
///
/// ## Rules
/// - Can be empty (returns the full catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed search term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }

    Ok(term.to_string())
}

/// Validates a new delivery address.
///
/// ## Rules
/// - `address_line1`, `city`, `state`, `postal_code` are required
/// - `address_line2` is optional
/// - Postal codes hold letters, digits, spaces and hyphens only
///
/// ## User Workflow
/// ```text
/// Cart screen: "Use a new address" toggled on
///       │
///       ▼
/// validate_new_address(form) ← THIS FUNCTION
///       │
///       ├── missing city? → Error: "city is required"
///       │
///       └── OK → address saved, then used for every order in the checkout
/// ```
pub fn validate_new_address(address: &NewAddress) -> ValidationResult<()> {
    validate_required("address_line1", &address.address_line1, MAX_ADDRESS_FIELD_LEN)?;
    if let Some(line2) = &address.address_line2 {
        if line2.chars().count() > MAX_ADDRESS_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: "address_line2".to_string(),
                max: MAX_ADDRESS_FIELD_LEN,
            });
        }
    }
    validate_required("city", &address.city, MAX_ADDRESS_FIELD_LEN)?;
    validate_required("state", &address.state, MAX_ADDRESS_FIELD_LEN)?;
    validate_required("postal_code", &address.postal_code, 12)?;

    if !address
        .postal_code
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ValidationError::invalid_format(
            "postal_code",
            "must contain only letters, digits, spaces and hyphens",
        ));
    }

    Ok(())
}

/// Validates a profile update.
///
/// ## Rules
/// - Full name at most 100 characters
/// - Phone number at most 20 characters of digits, spaces and `+ - ( )`
pub fn validate_profile_update(update: &ProfileUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.full_name {
        if name.trim().chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "full_name".to_string(),
                max: MAX_NAME_LEN,
            });
        }
    }

    if let Some(phone) = &update.phone_number {
        let phone = phone.trim();
        if phone.chars().count() > MAX_PHONE_LEN {
            return Err(ValidationError::TooLong {
                field: "phone_number".to_string(),
                max: MAX_PHONE_LEN,
            });
        }
        if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
        {
            return Err(ValidationError::invalid_format(
                "phone_number",
                "must contain only digits, spaces and + - ( )",
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most `MAX_PRICE_CENTS`
///
/// ## Example
/// ```rust
/// use forkful_core::money::Money;
/// use forkful_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1299)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// assert!(validate_price(Money::from_cents(i64::MAX / 2)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use forkful_core::validation::validate_uuid;
///
/// assert!(validate_uuid("user_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("user_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format(field, "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> NewAddress {
        NewAddress {
            address_line1: "123 Main St".to_string(),
            address_line2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            postal_code: "10001".to_string(),
        }
    }

    #[test]
    fn test_validate_new_address() {
        assert!(validate_new_address(&address()).is_ok());

        let mut missing_city = address();
        missing_city.city = "  ".to_string();
        let err = validate_new_address(&missing_city).unwrap_err();
        assert_eq!(err.to_string(), "city is required");

        let mut bad_postal = address();
        bad_postal.postal_code = "10001!".to_string();
        assert!(validate_new_address(&bad_postal).is_err());

        let mut uk = address();
        uk.postal_code = "SW1A 1AA".to_string();
        assert!(validate_new_address(&uk).is_ok());
    }

    #[test]
    fn test_validate_search_term() {
        assert_eq!(validate_search_term("  thai ").unwrap(), "thai");
        assert_eq!(validate_search_term("").unwrap(), "");
        assert!(validate_search_term(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_profile_update() {
        let ok = ProfileUpdate {
            full_name: Some("Ada Lovelace".to_string()),
            phone_number: Some("+1 (555) 010-2000".to_string()),
        };
        assert!(validate_profile_update(&ok).is_ok());
        assert!(validate_profile_update(&ProfileUpdate::default()).is_ok());

        let bad_phone = ProfileUpdate {
            full_name: None,
            phone_number: Some("call me".to_string()),
        };
        assert!(validate_profile_update(&bad_phone).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}
