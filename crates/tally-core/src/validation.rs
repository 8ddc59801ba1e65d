//! # Validation Module
//!
//! Input validation for values that come from a user or get written into a
//! flat file.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (console prompt / HTTP form)                       │
//! │  └── Type parsing (is it a number?)                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity > 0                                                      │
//! │  ├── item number within the catalog                                    │
//! │  └── names safe for a comma-separated line                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order flow                                                   │
//! │  └── stock on hand (InsufficientStock)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Turns a user-facing item number (1-based) into a catalog index.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_item_number;
///
/// assert_eq!(validate_item_number(1, 3).unwrap(), 0);
/// assert!(validate_item_number(4, 3).is_err());
/// ```
pub fn validate_item_number(number: i64, catalog_len: usize) -> ValidationResult<usize> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "item".to_string(),
        min: 1,
        max: catalog_len as i64,
    };

    let number = usize::try_from(number).map_err(|_| out_of_range())?;
    if number == 0 || number > catalog_len {
        return Err(out_of_range());
    }

    Ok(number - 1)
}

/// Validates an item name before it is written to a stock or order line.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain `,` or a line break (the file formats have no quoting)
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.contains([',', '\n', '\r']) {
        return Err(ValidationError::InvalidFormat {
            field: "name".to_string(),
            reason: "must not contain commas or line breaks".to_string(),
        });
    }

    Ok(())
}
