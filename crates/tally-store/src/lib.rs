//! # tally-store: Flat-File Persistence for Tally POS
//!
//! Reads and writes the stock file and the order ledger, loads
//! configuration, and runs the order flow that ties them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Data Flow                              │
//! │                                                                         │
//! │  HTTP handler / console prompt                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tally-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │ CatalogStore  │    │   format     │  │   │
//! │  │   │  (store.rs)   │───►│ OrderLedger   │───►│  line codec  │  │   │
//! │  │   │  order flow   │    │ file / memory │    │  atomic I/O  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            stock.txt                 orders.txt                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `Store` handle and the order flow
//! - [`catalog`] - Catalog persistence
//! - [`ledger`] - Order ledger persistence
//! - [`format`] - Stock and ledger line formats
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_store::{InvoiceRequest, Store, TallyConfig};
//! use tally_core::Currency;
//!
//! let store = Store::open(&TallyConfig::load(None)?)?;
//! for line in store.catalog().await?.item_list() {
//!     println!("{line}");
//! }
//! let receipt = store.create_invoice(InvoiceRequest::new(0, 3, Currency::Eur)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod atomic;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{CatalogStore, FileCatalogStore, MemoryCatalogStore};
pub use config::TallyConfig;
pub use error::{StoreError, StoreResult};
pub use ledger::{FileOrderLedger, MemoryOrderLedger, OrderLedger};
pub use store::{InvoiceRequest, Receipt, Store};
