//! # API Error Type
//!
//! Unified error type for client commands, plus the checkout error that
//! keeps track of partially placed orders.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Forkful                                │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError ──► VALIDATION_ERROR,          │
//! │         │                                   BUSINESS_LOGIC             │
//! │         ├── DbError ──────────────────────► NOT_FOUND, DATABASE_ERROR  │
//! │         │   (details logged, generic message returned)                 │
//! │         └── CheckoutError ────────────────► CHECKOUT_FAILED            │
//! │             (names the failing restaurant and what was placed)         │
//! │                                                                         │
//! │  Frontend receives: { "code": "NOT_FOUND", "message": "..." }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use forkful_core::{CoreError, Order, ValidationError};
use forkful_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Restaurant not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business rule refused the operation
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// One or more orders of a checkout could not be placed
    CheckoutFailed,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Duplicate { target } => {
                ApiError::new(ErrorCode::ValidationError, format!("{} already exists", target))
            }
            DbError::MissingReference(message) => {
                tracing::error!("Missing reference: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConstraintViolation(message) => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid value")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Serialization { field, reason } => {
                tracing::error!(%field, %reason, "Stored value could not be read");
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::Rule(e) => ApiError::from(e),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::NoDeliveryAddress => ApiError::validation(err.to_string()),
            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout did not fully complete.
///
/// ## Outcomes
/// ```text
/// Rejected            → nothing sent, nothing written, cart unchanged
/// Address             → saved address missing or new one not saved,
///                       no order sent, cart unchanged
/// Submission          → orders in `placed` exist, the rest were not sent,
///                       cart unchanged (resubmitting re-sends every group)
/// AtomicSubmission    → nothing written, cart unchanged
/// ```
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Refused before any storage call (empty cart, no address, bad input).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The selected address is gone, or the new one could not be saved.
    #[error("Delivery address unavailable: {0}")]
    Address(#[source] DbError),

    /// An order failed in sequential mode; earlier orders stay placed.
    #[error(
        "Order for {restaurant_name} could not be placed ({} earlier order(s) were placed): {source}",
        .placed.len()
    )]
    Submission {
        restaurant_id: String,
        restaurant_name: String,
        placed: Vec<Order>,
        #[source]
        source: DbError,
    },

    /// The single all-or-nothing transaction failed.
    #[error("Orders could not be placed: {0}")]
    AtomicSubmission(#[source] DbError),
}

impl CheckoutError {
    /// Orders that were persisted before the failure.
    pub fn placed(&self) -> &[Order] {
        match self {
            CheckoutError::Submission { placed, .. } => placed,
            _ => &[],
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(e) => ApiError::from(e),
            CheckoutError::Address(e) if e.is_not_found() => ApiError::new(
                ErrorCode::CheckoutFailed,
                "The selected delivery address no longer exists. No order was placed.",
            ),
            CheckoutError::Address(e) => {
                tracing::error!(error = %e, "Saving delivery address failed");
                ApiError::new(
                    ErrorCode::CheckoutFailed,
                    "Could not save the delivery address. No order was placed.",
                )
            }
            CheckoutError::Submission {
                restaurant_id,
                restaurant_name,
                placed,
                source,
            } => {
                tracing::error!(
                    %restaurant_id,
                    error = %source,
                    placed = placed.len(),
                    "Order submission failed"
                );
                let message = if placed.is_empty() {
                    format!(
                        "Order for {} could not be placed. Your cart was kept.",
                        restaurant_name
                    )
                } else {
                    let names: Vec<&str> =
                        placed.iter().map(|o| o.restaurant_name.as_str()).collect();
                    format!(
                        "Order for {} could not be placed. Orders already placed: {}. Your cart was kept.",
                        restaurant_name,
                        names.join(", ")
                    )
                };
                ApiError::new(ErrorCode::CheckoutFailed, message)
            }
            CheckoutError::AtomicSubmission(e) => {
                tracing::error!(error = %e, "Atomic order submission failed");
                ApiError::new(
                    ErrorCode::CheckoutFailed,
                    "Your orders could not be placed. Nothing was charged and your cart was kept.",
                )
            }
        }
    }
}
