//! # Order Ledger
//!
//! Append-only record of fulfilled orders, stored newest first.
//!
//! ## Append
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(order)                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► read file (missing = empty) ──► parse (count N)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  new line + old contents ──► temp file ──► rename ──► OrderId(N + 1)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing the existing contents before prepending means a corrupt ledger is
//! reported instead of being buried under new orders.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tally_core::{CoreError, OrderId, OrderLine};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::atomic::{read_or_empty, write_atomic};
use crate::error::StoreResult;
use crate::format::{format_order_line, parse_ledger};

/// Order persistence.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Records `order` as the newest entry and returns its id.
    async fn append(&self, order: &OrderLine) -> StoreResult<OrderId>;

    /// Every order, newest first.
    async fn load_all(&self) -> StoreResult<Vec<OrderLine>>;

    /// A single order by id.
    async fn get(&self, id: OrderId) -> StoreResult<OrderLine> {
        let mut orders = self.load_all().await?;
        let position = id
            .position_in(orders.len())
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        Ok(orders.swap_remove(position))
    }
}

// =============================================================================
// File Ledger
// =============================================================================

/// Ledger backed by a comma-separated file, newest order on the first line.
#[derive(Debug)]
pub struct FileOrderLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileOrderLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileOrderLedger {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OrderLedger for FileOrderLedger {
    async fn append(&self, order: &OrderLine) -> StoreResult<OrderId> {
        let line = format_order_line(order)?;

        let _guard = self.write_lock.lock().await;
        let existing = read_or_empty(&self.path).await?;
        let count = parse_ledger(&self.path, &existing)?.len();

        let mut contents = String::with_capacity(line.len() + 1 + existing.len());
        contents.push_str(&line);
        contents.push('\n');
        contents.push_str(&existing);
        write_atomic(&self.path, &contents).await?;

        let id = OrderId(count as u64 + 1);
        debug!(path = %self.path.display(), order_id = %id, "Order appended");
        Ok(id)
    }

    async fn load_all(&self) -> StoreResult<Vec<OrderLine>> {
        let contents = read_or_empty(&self.path).await?;
        parse_ledger(&self.path, &contents)
    }
}

// =============================================================================
// Memory Ledger
// =============================================================================

/// Ledger held in memory, newest first.
#[derive(Debug, Default)]
pub struct MemoryOrderLedger {
    orders: RwLock<Vec<OrderLine>>,
}

impl MemoryOrderLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderLedger for MemoryOrderLedger {
    async fn append(&self, order: &OrderLine) -> StoreResult<OrderId> {
        format_order_line(order)?;
        let mut orders = self.orders.write().await;
        orders.insert(0, order.clone());
        Ok(OrderId(orders.len() as u64))
    }

    async fn load_all(&self) -> StoreResult<Vec<OrderLine>> {
        Ok(self.orders.read().await.clone())
    }
}
