//! # Error Types
//!
//! Domain-specific error types for tabletop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tabletop-core errors (this file)                                      │
//! │  ├── CoreError        - Billing rule violations                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tabletop-db errors (separate crate)                                   │
//! │  └── DbError          - Store failures, NotFound, UniqueViolation      │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Billing rule violations raised while turning a cart into an order.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart had no lines.
    #[error("cart must contain at least one line")]
    EmptyCart,

    /// A cart line references an item that is missing, unavailable or deleted.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [Paneer Tikka × 1]
    ///      │
    ///      ▼
    /// Catalog lookup: status = Unavailable
    ///      │
    ///      ▼
    /// ItemUnavailable { item: "Paneer Tikka" }
    ///      │
    ///      ▼
    /// Counter shows: "Item Paneer Tikka is not available"
    /// ```
    #[error("Item {item} is not available")]
    ItemUnavailable {
        /// Item id the client sent.
        item_id: String,
        /// Item name if the catalog knows it, otherwise the id.
        item: String,
    },

    /// Discount would push the grand total below zero.
    #[error("discount {discount} exceeds bill total {total}")]
    DiscountExceedsTotal { discount: i64, total: i64 },

    /// A monetary computation overflowed i64.
    #[error("amount overflow while computing {0}")]
    AmountOverflow(&'static str),

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

    /// Invalid format (e.g., invalid UUID, malformed bill number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_unavailable_names_item() {
        let err = CoreError::ItemUnavailable {
            item_id: "abc".to_string(),
            item: "Paneer Tikka".to_string(),
        };
        assert_eq!(err.to_string(), "Item Paneer Tikka is not available");
    }

    #[test]
    fn test_empty_cart_message() {
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "cart must contain at least one line"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "category".to_string(),
        };
        assert_eq!(err.to_string(), "category is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
