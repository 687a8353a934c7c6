//! # Error Types
//!
//! Domain-specific error types for forkful-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forkful-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule failures (empty cart, etc.)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  forkful-db errors (separate crate)                                    │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  forkful-client errors                                                 │
//! │  ├── CheckoutError    - Where in the order flow a checkout stopped     │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is reported to the user and is retryable by re-invoking
/// the same operation once the input is fixed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout was attempted with no saved address selected and no new
    /// address supplied.
    ///
    /// ## User Workflow
    /// ```text
    /// Place Order
    ///      │
    ///      ▼
    /// selected address? ── no ──► new address? ── no ──► NoDeliveryAddress
    ///                                                      │
    ///                                                      ▼
    ///                          UI shows: "Please select or add a delivery address"
    /// ```
    #[error("Please select or add a delivery address")]
    NoDeliveryAddress,

    /// An order cannot move from its current status to the requested one.
    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
