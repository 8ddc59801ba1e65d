//! # tally-server
//!
//! HTTP front end over a [`Store`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request ──► axum Router ──► handler ──► Store ──► stock.txt            │
//! │                                │                   orders.txt           │
//! │                                ▼                                        │
//! │                        JSON / 303 redirect / ApiError                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_store::Store;
use tracing_subscriber::EnvFilter;

/// Shared handler state.
#[derive(Debug)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(AppState {
            store: Arc::new(store),
        })
    }
}

/// Builds the full router.
pub fn app_router(state: Arc<AppState>) -> Router {
    routes::router().with_state(state)
}

/// Installs the tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
