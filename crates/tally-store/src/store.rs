//! # Store Handle
//!
//! Owns the catalog store, the order ledger and the pricing rules, and runs
//! the order flow across them.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_invoice(item, quantity, currency)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate quantity > 0                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────── order lock held ────────────────────────────────┐   │
//! │  │  load catalog ──► item exists? ──► enough stock?                │   │
//! │  │       │                                                          │   │
//! │  │       ▼                                                          │   │
//! │  │  compute_invoice (stock -= quantity)                             │   │
//! │  │       │                                                          │   │
//! │  │       ▼                                                          │   │
//! │  │  save catalog ──► append order ──✗──► save original catalog     │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt { order_id, line }                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concurrent orders never interleave their load and save, so stock can
//! not be sold twice.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_core::validation::validate_quantity;
use tally_core::{
    compute_invoice, Catalog, CoreError, Currency, OrderId, OrderLine, PricingConfig,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::catalog::{CatalogStore, FileCatalogStore};
use crate::config::TallyConfig;
use crate::error::StoreResult;
use crate::ledger::{FileOrderLedger, OrderLedger};

// =============================================================================
// Request / Receipt
// =============================================================================

/// One order as entered by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    /// 0-based catalog position.
    pub item_index: usize,
    pub quantity: i64,
    pub currency: Currency,
}

impl InvoiceRequest {
    pub fn new(item_index: usize, quantity: i64, currency: Currency) -> Self {
        InvoiceRequest {
            item_index,
            quantity,
            currency,
        }
    }
}

/// A recorded order and the id it was stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order_id: OrderId,
    pub line: OrderLine,
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle over catalog, ledger and pricing rules.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::open(&TallyConfig::load(None)?)?;
/// let receipt = store
///     .create_invoice(InvoiceRequest::new(0, 3, Currency::Eur))
///     .await?;
/// println!("order {} recorded", receipt.order_id);
/// ```
pub struct Store {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn OrderLedger>,
    pricing: PricingConfig,
    order_lock: Mutex<()>,
}

impl Store {
    /// Creates a store over any catalog/ledger pair.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        ledger: Arc<dyn OrderLedger>,
        pricing: PricingConfig,
    ) -> Self {
        Store {
            catalog,
            ledger,
            pricing,
            order_lock: Mutex::new(()),
        }
    }

    /// Creates a file-backed store from configuration.
    pub fn open(config: &TallyConfig) -> StoreResult<Self> {
        let pricing = config.pricing_config()?;
        info!(
            stock = %config.files.stock.display(),
            orders = %config.files.orders.display(),
            vat_rate = %pricing.vat_rate,
            "Opening store"
        );
        Ok(Store::new(
            Arc::new(FileCatalogStore::new(&config.files.stock)),
            Arc::new(FileOrderLedger::new(&config.files.orders)),
            pricing,
        ))
    }

    /// Pricing rules in effect.
    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Current catalog, freshly loaded.
    pub async fn catalog(&self) -> StoreResult<Catalog> {
        self.catalog.load().await
    }

    /// All orders, newest first, paired with their ids.
    pub async fn orders(&self) -> StoreResult<Vec<(OrderId, OrderLine)>> {
        let orders = self.ledger.load_all().await?;
        let len = orders.len();
        Ok(orders
            .into_iter()
            .enumerate()
            .map(|(position, line)| (OrderId::at_position(position, len), line))
            .collect())
    }

    /// One order by id.
    pub async fn order(&self, id: OrderId) -> StoreResult<OrderLine> {
        self.ledger.get(id).await
    }

    /// Prices an order, takes it out of stock and records it.
    ///
    /// ## Errors
    /// - `Validation` if quantity is not positive
    /// - `RecordNotFound` if the item index is outside the catalog
    /// - `InsufficientStock` if fewer units are on hand than requested
    /// - `UnsupportedCurrency` if the currency has no configured rate
    /// - I/O and malformed-record errors from either file
    ///
    /// If the ledger write fails after the catalog was saved, the original
    /// catalog is written back before the error is returned.
    pub async fn create_invoice(&self, request: InvoiceRequest) -> StoreResult<Receipt> {
        let InvoiceRequest {
            item_index,
            quantity,
            currency,
        } = request;
        validate_quantity(quantity).map_err(CoreError::from)?;

        let _guard = self.order_lock.lock().await;

        let original = self.catalog.load().await?;
        let item = original.get(item_index)?;
        if !original.has_sufficient_quantity(item_index, quantity) {
            debug!(item = %item.name, available = item.quantity, requested = quantity, "Order refused");
            return Err(CoreError::InsufficientStock {
                item: item.name.clone(),
                available: item.quantity,
                requested: quantity,
            }
            .into());
        }
        let item_name = item.name.clone();

        let mut updated = original.clone();
        let pricing = compute_invoice(&self.pricing, &mut updated, item_index, quantity, currency)?;
        let line = OrderLine::new(item_name, quantity, currency, &pricing);

        self.catalog.save(&updated).await?;

        let order_id = match self.ledger.append(&line).await {
            Ok(id) => id,
            Err(err) => {
                match self.catalog.save(&original).await {
                    Ok(()) => warn!(error = %err, "Order not recorded, stock restored"),
                    Err(restore_err) => warn!(
                        error = %err,
                        restore_error = %restore_err,
                        "Order not recorded and stock restore failed"
                    ),
                }
                return Err(err);
            }
        };

        info!(
            order_id = %order_id,
            item = %line.item_name,
            quantity,
            currency = %currency,
            net_total = %line.net_total,
            "Order recorded"
        );
        Ok(Receipt { order_id, line })
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalogStore;
    use crate::error::StoreError;
    use crate::ledger::MemoryOrderLedger;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use tally_core::{Money, StockItem};

    fn widget_catalog() -> Catalog {
        Catalog::new(vec![
            StockItem::new("Widget", Money::new(dec!(10.00)), 5),
            StockItem::new("Gadget", Money::new(dec!(2.50)), 12),
        ])
    }

    fn memory_store() -> Store {
        Store::new(
            Arc::new(MemoryCatalogStore::new(widget_catalog())),
            Arc::new(MemoryOrderLedger::new()),
            PricingConfig::default(),
        )
    }

    /// Ledger whose appends always fail.
    struct BrokenLedger;

    #[async_trait]
    impl OrderLedger for BrokenLedger {
        async fn append(&self, _order: &OrderLine) -> StoreResult<OrderId> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        async fn load_all(&self) -> StoreResult<Vec<OrderLine>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_create_invoice_eur() {
        let store = memory_store();
        let receipt = store
            .create_invoice(InvoiceRequest::new(0, 3, Currency::Eur))
            .await
            .unwrap();

        assert_eq!(receipt.order_id, OrderId(1));
        let line = &receipt.line;
        assert_eq!(line.item_name, "Widget");
        assert_eq!(line.unit_price.to_string(), "10.00");
        assert_eq!(line.subtotal.to_string(), "30.00");
        assert_eq!(line.discount.to_string(), "3.00");
        assert_eq!(line.vat.to_string(), "5.94");
        assert_eq!(line.net_total.to_string(), "32.94");

        assert_eq!(store.catalog().await.unwrap().items()[0].quantity, 2);
        assert_eq!(store.order(OrderId(1)).await.unwrap(), receipt.line);
    }

    #[tokio::test]
    async fn test_create_invoice_usd() {
        let store = memory_store();
        let line = store
            .create_invoice(InvoiceRequest::new(0, 3, Currency::Usd))
            .await
            .unwrap()
            .line;

        assert_eq!(line.unit_price.to_string(), "10.90");
        assert_eq!(line.subtotal.to_string(), "32.70");
        assert_eq!(line.discount.to_string(), "3.27");
        assert_eq!(line.vat.to_string(), "6.47");
        assert_eq!(line.net_total.to_string(), "35.90");
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_everything_untouched() {
        let store = memory_store();
        let err = store
            .create_invoice(InvoiceRequest::new(0, 6, Currency::Eur))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(store.catalog().await.unwrap(), widget_catalog());
        assert!(store.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let store = memory_store();

        assert!(matches!(
            store.create_invoice(InvoiceRequest::new(9, 1, Currency::Eur)).await,
            Err(StoreError::Core(CoreError::RecordNotFound { .. }))
        ));
        assert!(matches!(
            store.create_invoice(InvoiceRequest::new(0, 0, Currency::Eur)).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(store.catalog().await.unwrap(), widget_catalog());
    }

    #[tokio::test]
    async fn test_currency_without_rate_is_refused_before_saving() {
        let mut pricing = PricingConfig::default();
        pricing.rates.remove(&Currency::Gbp);
        let store = Store::new(
            Arc::new(MemoryCatalogStore::new(widget_catalog())),
            Arc::new(MemoryOrderLedger::new()),
            pricing,
        );

        assert!(matches!(
            store.create_invoice(InvoiceRequest::new(0, 1, Currency::Gbp)).await,
            Err(StoreError::Core(CoreError::UnsupportedCurrency(_)))
        ));
        assert_eq!(store.catalog().await.unwrap(), widget_catalog());
    }

    #[tokio::test]
    async fn test_overflowing_order_is_refused() {
        let yacht = || {
            Catalog::new(vec![StockItem::new(
                "Yacht",
                Money::new(dec!(75000000000000000000000000000)),
                5,
            )])
        };
        let store = Store::new(
            Arc::new(MemoryCatalogStore::new(yacht())),
            Arc::new(MemoryOrderLedger::new()),
            PricingConfig::default(),
        );

        assert!(matches!(
            store.create_invoice(InvoiceRequest::new(0, 1, Currency::Usd)).await,
            Err(StoreError::Core(CoreError::AmountOverflow { .. }))
        ));
        assert_eq!(store.catalog().await.unwrap(), yacht());
        assert!(store.orders().await.unwrap().is_empty());

        // the same item still sells in a currency that fits
        let receipt = store
            .create_invoice(InvoiceRequest::new(0, 1, Currency::Gbp))
            .await
            .unwrap();
        assert_eq!(receipt.order_id, OrderId(1));
    }

    #[tokio::test]
    async fn test_blank_item_name_is_a_malformed_stock_file() {
        let dir = tempfile::tempdir().unwrap();
        let stock = dir.path().join("stock.txt");
        tokio::fs::write(&stock, "Widget,10.00,5\n,1.00,3\n").await.unwrap();

        let mut config = TallyConfig::default();
        config.files.stock = stock;
        config.files.orders = dir.path().join("orders.txt");
        let store = Store::open(&config).unwrap();

        assert!(matches!(
            store.create_invoice(InvoiceRequest::new(0, 1, Currency::Eur)).await,
            Err(StoreError::MalformedRecord { line: 2, .. })
        ));
        assert!(matches!(
            store.catalog().await,
            Err(StoreError::MalformedRecord { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_ledger_failure_restores_stock() {
        let store = Store::new(
            Arc::new(MemoryCatalogStore::new(widget_catalog())),
            Arc::new(BrokenLedger),
            PricingConfig::default(),
        );

        let err = store
            .create_invoice(InvoiceRequest::new(0, 2, Currency::Eur))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.catalog().await.unwrap(), widget_catalog());
    }

    #[tokio::test]
    async fn test_orders_are_newest_first_with_stable_ids() {
        let store = memory_store();
        store.create_invoice(InvoiceRequest::new(0, 1, Currency::Eur)).await.unwrap();
        store.create_invoice(InvoiceRequest::new(1, 4, Currency::Gbp)).await.unwrap();

        let orders = store.orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].0, OrderId(2));
        assert_eq!(orders[0].1.item_name, "Gadget");
        assert_eq!(orders[1].0, OrderId(1));
        assert_eq!(orders[1].1.item_name, "Widget");
    }

    #[tokio::test]
    async fn test_concurrent_orders_never_oversell() {
        let store = Arc::new(memory_store());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.create_invoice(InvoiceRequest::new(0, 1, Currency::Eur)).await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 5);
        assert_eq!(store.catalog().await.unwrap().items()[0].quantity, 0);
        assert_eq!(store.orders().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let stock = dir.path().join("stock.txt");
        tokio::fs::write(&stock, "Widget,10.00,5\nGadget,2.50,12\n").await.unwrap();

        let mut config = TallyConfig::default();
        config.files.stock = stock.clone();
        config.files.orders = dir.path().join("orders.txt");
        let store = Store::open(&config).unwrap();

        let receipt = store
            .create_invoice(InvoiceRequest::new(0, 3, Currency::Eur))
            .await
            .unwrap();
        assert_eq!(receipt.order_id, OrderId(1));

        assert_eq!(
            tokio::fs::read_to_string(&stock).await.unwrap(),
            "Widget,10.00,2\nGadget,2.50,12\n"
        );
        assert_eq!(
            tokio::fs::read_to_string(&config.files.orders).await.unwrap(),
            "Widget,3,EUR,10.00,30.00,3.00,5.94,32.94\n"
        );
    }
}
