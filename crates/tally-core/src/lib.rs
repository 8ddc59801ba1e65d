//! # tally-core: Pure Business Logic for Tally POS
//!
//! Catalog bookkeeping, invoice pricing and invoice presentation. Everything
//! here is a pure function over values the caller passes in; file access
//! lives in `tally-store`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  tally-server (HTTP / axum)  │   │  tally-console (stdin/out)   │   │
//! │  └──────────────┬───────────────┘   └──────────────┬───────────────┘   │
//! │                 └──────────────┬───────────────────┘                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            tally-store (flat files, order flow, config)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  pricing  │  │  invoice  │  │ validation│  │   │
//! │  │   │  Catalog  │  │ discount  │  │DisplayRow │  │   rules   │  │   │
//! │  │   │ StockItem │  │ VAT / FX  │  │   lines   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • CONFIG PASSED IN                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockItem, PricingResult, OrderLine, OrderId)
//! - [`money`] - Decimal money with half-to-even rounding
//! - [`currency`] - Supported invoice currencies
//! - [`catalog`] - Ordered stock list
//! - [`pricing`] - Discount, VAT and currency conversion
//! - [`invoice`] - Label/value rows for display
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{compute_invoice, Catalog, Currency, Money, PricingConfig, StockItem};
//!
//! let config = PricingConfig::default();
//! let mut catalog = Catalog::new(vec![
//!     StockItem::new("Widget", Money::new(Decimal::new(1000, 2)), 5),
//! ]);
//!
//! let invoice = compute_invoice(&config, &mut catalog, 0, 3, Currency::Eur).unwrap();
//! assert_eq!(invoice.net_total.to_string(), "32.94");
//! assert_eq!(catalog.items()[0].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod currency;
pub mod error;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use currency::Currency;
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{invoice_lines, to_display_rows, DisplayRow};
pub use money::Money;
pub use pricing::{
    compute_discount, compute_invoice, compute_vat, convert_currency, convert_currency_code,
    DiscountTier, PricingConfig,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places every invoice amount is rounded to.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;
