//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing / catalog rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - File parsing and I/O failures                  │
//! │                                                                         │
//! │  Front ends                                                            │
//! │  ├── ApiError         - HTTP status + JSON body (server)               │
//! │  └── ConsoleError     - Printed and the session stops (console)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Currency code outside the supported set, or a currency that has no
    /// configured conversion rate.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Requested quantity exceeds what is in stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Enter Item: 1 (Widget)
    /// Enter Amount: 7
    ///      │
    ///      ▼
    /// Check stock: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { item: "Widget", available: 5, requested: 7 }
    /// ```
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// An invoice amount or stock count left the representable range.
    #[error("Amount out of range: {operation} overflowed")]
    AmountOverflow { operation: &'static str },

    /// A catalog item or ledger order does not exist.
    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: &'static str, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a RecordNotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::RecordNotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any pricing or persistence work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a comma inside an item name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
