//! Server configuration: the shared store config plus a listen address.

use std::net::SocketAddr;
use std::path::PathBuf;
use tally_store::{StoreError, StoreResult, TallyConfig};
use tracing::debug;

/// Env var for the listen address.
pub const BIND_ADDR_ENV: &str = "TALLY_BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: TallyConfig,
}

impl ServerConfig {
    /// Loads the store config (file + env) and reads `TALLY_BIND_ADDR`.
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let store = TallyConfig::load(config_path)?;
        let bind_addr = parse_bind_addr(std::env::var(BIND_ADDR_ENV).ok().as_deref())?;
        debug!(%bind_addr, "Server config loaded");
        Ok(ServerConfig { bind_addr, store })
    }
}

fn parse_bind_addr(raw: Option<&str>) -> StoreResult<SocketAddr> {
    let raw = raw.unwrap_or(DEFAULT_BIND_ADDR);
    raw.trim()
        .parse()
        .map_err(|_| StoreError::InvalidConfig(format!("{BIND_ADDR_ENV} is not a socket address: '{raw}'")))
}
