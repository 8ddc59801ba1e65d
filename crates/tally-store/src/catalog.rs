//! # Catalog Store
//!
//! Loads and saves the whole stock list.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trait CatalogStore                                                     │
//! │     │                                                                   │
//! │     ├── FileCatalogStore    stock file on disk (production)            │
//! │     └── MemoryCatalogStore  in-process copy (tests, demos)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no caching: every `load` re-reads the source.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tally_core::Catalog;
use tokio::sync::RwLock;
use tracing::debug;

use crate::atomic::write_atomic;
use crate::error::StoreResult;
use crate::format::{format_catalog, parse_catalog};

/// Whole-catalog persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Reads every stock item, in source order.
    async fn load(&self) -> StoreResult<Catalog>;

    /// Replaces the stored catalog with `catalog`.
    async fn save(&self, catalog: &Catalog) -> StoreResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

/// Catalog backed by a `name,price,quantity` stock file.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    /// Creates a store for the stock file at `path`. The file is not touched
    /// until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCatalogStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn load(&self) -> StoreResult<Catalog> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let catalog = parse_catalog(&self.path, &contents)?;
        debug!(path = %self.path.display(), items = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    async fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        let contents = format_catalog(catalog)?;
        write_atomic(&self.path, &contents).await?;
        debug!(path = %self.path.display(), items = catalog.len(), "Catalog saved");
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: RwLock<Catalog>,
}

impl MemoryCatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        MemoryCatalogStore {
            catalog: RwLock::new(catalog),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn load(&self) -> StoreResult<Catalog> {
        Ok(self.catalog.read().await.clone())
    }

    async fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        // same name rules as the file store
        format_catalog(catalog)?;
        *self.catalog.write().await = catalog.clone();
        Ok(())
    }
}
