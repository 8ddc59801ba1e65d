//! # Tally Console
//!
//! Interactive order entry on stdin/stdout. Logs go to stderr.

mod session;

use std::io;

use tally_store::{Store, TallyConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::{run_session, SessionOutcome};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = TallyConfig::load(None)?;
    let store = Store::open(&config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    match run_session(&store, &mut input, &mut output).await? {
        SessionOutcome::Completed(receipt) => info!(order_id = %receipt.order_id, "Session complete"),
        SessionOutcome::Stopped(reason) => info!(%reason, "Session ended without an order"),
    }
    Ok(())
}
