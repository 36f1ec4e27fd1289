//! # Error Types
//!
//! Domain errors for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Error Types                                  │
//! │                                                                         │
//! │  caja-core (this file)                                                  │
//! │  ├── CoreError        - business rule violations                        │
//! │  └── ValidationError  - operator input that never reaches the rules     │
//! │                                                                         │
//! │  caja-db    → DbError        (storage failures, rollbacks)              │
//! │  caja-rates → RateFeedError  (network/parse, never fatal)               │
//! │  caja-app   → AppError       (auth, license, wiring)                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError/AppError → operator        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Context in the message (barcode, available stock, requested qty)
//! 3. Enum variants, never bare strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product carries the scanned barcode / id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A sale would debit more units than are on hand.
    ///
    /// Raised both when staging a cart line (stock ceiling at add time)
    /// and when a commit re-validates against current stock. At commit
    /// time this aborts the whole transaction; nothing is written.
    #[error("Insufficient stock for {barcode}: available {available}, requested {requested}")]
    InsufficientStock {
        barcode: String,
        available: i64,
        requested: i64,
    },

    /// Commit was attempted on a cart with no lines (or a zero amount).
    #[error("Draft transaction is empty; nothing to commit")]
    EmptyDraft,

    /// Input validation failure (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Operator-input problems, reported before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value exceeds its length bound.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Malformed value (bad number, bad phone number, bad barcode charset).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Profit margin at or above 100% makes the sale-price derivation
    /// divide by zero or go negative; rejected outright.
    #[error("profit margin must be below 100% (got {pct})")]
    MarginTooHigh { pct: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_carries_context() {
        let err = CoreError::InsufficientStock {
            barcode: "7591001234567".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 7591001234567: available 3, requested 5"
        );
    }

    #[test]
    fn validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "barcode".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: barcode is required");
    }

    #[test]
    fn margin_message() {
        let err = ValidationError::MarginTooHigh { pct: 100.0 };
        assert_eq!(err.to_string(), "profit margin must be below 100% (got 100)");
    }
}
