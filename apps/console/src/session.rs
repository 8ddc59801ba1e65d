//! # Console Session
//!
//! One order, taken interactively.
//!
//! ```text
//! 1 : Widget
//! 2 : Gadget
//! Enter Item: 1
//! Item Selected: Widget
//! Enter Amount: 3
//! Enter Currency (EUR, GBP, USD): EUR
//! Item:           |  Widget
//! ...
//! Net Total:      |  32.94
//! Currency:       |  EUR
//! ```
//!
//! Bad input ends the session with a message. Nothing is written to disk
//! unless the whole order goes through.

use std::io::{BufRead, Write};

use tally_core::validation::{validate_item_number, validate_quantity};
use tally_core::{invoice_lines, CoreError, Currency};
use tally_store::{InvoiceRequest, Receipt, Store, StoreError};
use thiserror::Error;
use tracing::debug;

pub const NOT_ENOUGH_STOCK: &str = "Not enough quantity in stock to complete order";
pub const INVALID_CURRENCY: &str = "Invalid currency entered";

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Terminal read or write failed.
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Order recorded and invoice printed.
    Completed(Receipt),
    /// Input was rejected; the message has already been printed.
    Stopped(String),
}

/// Runs one order-entry session against `store`.
pub async fn run_session<R: BufRead, W: Write>(
    store: &Store,
    input: &mut R,
    output: &mut W,
) -> Result<SessionOutcome, ConsoleError> {
    let catalog = store.catalog().await?;
    for line in catalog.item_list() {
        writeln!(output, "{line}")?;
    }

    let Some(raw_item) = prompt(input, output, "Enter Item: ")? else {
        return stop(output, "No item entered");
    };
    let item_index = match raw_item
        .parse::<i64>()
        .map_err(|_| format!("Invalid item: {raw_item}"))
        .and_then(|n| validate_item_number(n, catalog.len()).map_err(|e| e.to_string()))
    {
        Ok(index) => index,
        Err(message) => return stop(output, &message),
    };
    let item = catalog.get(item_index).map_err(StoreError::from)?;
    writeln!(output, "Item Selected: {}", item.name)?;

    let Some(raw_quantity) = prompt(input, output, "Enter Amount: ")? else {
        return stop(output, "No amount entered");
    };
    let quantity = match raw_quantity.parse::<i64>() {
        Ok(q) => q,
        Err(_) => return stop(output, &format!("Invalid amount: {raw_quantity}")),
    };
    if let Err(err) = validate_quantity(quantity) {
        return stop(output, &err.to_string());
    }
    if !catalog.has_sufficient_quantity(item_index, quantity) {
        return stop(output, NOT_ENOUGH_STOCK);
    }

    let codes = Currency::codes().join(", ");
    let Some(raw_currency) = prompt(input, output, &format!("Enter Currency ({codes}): "))? else {
        return stop(output, INVALID_CURRENCY);
    };
    let currency: Currency = match raw_currency.parse() {
        Ok(c) => c,
        Err(_) => return stop(output, INVALID_CURRENCY),
    };

    let request = InvoiceRequest::new(item_index, quantity, currency);
    let receipt = match store.create_invoice(request).await {
        Ok(receipt) => receipt,
        // stock can change between the listing and the order
        Err(StoreError::Core(CoreError::InsufficientStock { .. })) => {
            return stop(output, NOT_ENOUGH_STOCK)
        }
        Err(StoreError::Core(CoreError::UnsupportedCurrency(_))) => {
            return stop(output, INVALID_CURRENCY)
        }
        Err(StoreError::Core(err @ CoreError::AmountOverflow { .. })) => {
            return stop(output, &err.to_string())
        }
        Err(err) => return Err(err.into()),
    };

    for line in invoice_lines(&receipt.line) {
        writeln!(output, "{line}")?;
    }
    output.flush()?;
    Ok(SessionOutcome::Completed(receipt))
}

/// Prints `label`, reads one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>, ConsoleError> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn stop<W: Write>(output: &mut W, message: &str) -> Result<SessionOutcome, ConsoleError> {
    debug!(reason = message, "Session stopped");
    writeln!(output, "{message}")?;
    output.flush()?;
    Ok(SessionOutcome::Stopped(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;
    use std::sync::Arc;
    use tally_core::{Catalog, Money, OrderId, PricingConfig, StockItem};
    use tally_store::{MemoryCatalogStore, MemoryOrderLedger};

    fn store() -> Store {
        Store::new(
            Arc::new(MemoryCatalogStore::new(Catalog::new(vec![
                StockItem::new("Widget", Money::new(dec!(10.00)), 5),
                StockItem::new("Gadget", Money::new(dec!(2.50)), 12),
            ]))),
            Arc::new(MemoryOrderLedger::new()),
            PricingConfig::default(),
        )
    }

    async fn run(store: &Store, input: &str) -> (SessionOutcome, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let outcome = run_session(store, &mut input, &mut output).await.unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_full_session() {
        let store = store();
        let (outcome, output) = run(&store, "1\n3\nEUR\n").await;

        match outcome {
            SessionOutcome::Completed(receipt) => assert_eq!(receipt.order_id, OrderId(1)),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(output.starts_with("1 : Widget\n2 : Gadget\nEnter Item: Item Selected: Widget\n"));
        assert!(output.contains("Enter Amount: Enter Currency (EUR, GBP, USD): "));
        assert!(output.contains("Net Total:\t|  32.94\n"));
        assert!(output.ends_with("Currency:\t|  EUR\n"));

        assert_eq!(store.catalog().await.unwrap().items()[0].quantity, 2);
        assert_eq!(store.orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_not_enough_stock() {
        let store = store();
        let (outcome, output) = run(&store, "1\n6\n").await;

        assert!(matches!(outcome, SessionOutcome::Stopped(ref m) if m == NOT_ENOUGH_STOCK));
        assert!(output.ends_with("Not enough quantity in stock to complete order\n"));
        assert!(!output.contains("Enter Currency"));
        assert!(store.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_currency() {
        let store = store();
        let (outcome, output) = run(&store, "2\n1\nJPY\n").await;

        assert!(matches!(outcome, SessionOutcome::Stopped(ref m) if m == INVALID_CURRENCY));
        assert!(output.ends_with("Invalid currency entered\n"));
        assert_eq!(store.catalog().await.unwrap().items()[1].quantity, 12);
    }

    #[tokio::test]
    async fn test_bad_item_and_amount() {
        let store = store();

        let (outcome, output) = run(&store, "7\n").await;
        assert!(matches!(outcome, SessionOutcome::Stopped(_)));
        assert!(output.ends_with("item must be between 1 and 2\n"));

        let (outcome, _) = run(&store, "abc\n").await;
        assert!(matches!(outcome, SessionOutcome::Stopped(_)));

        let (outcome, output) = run(&store, "1\n0\n").await;
        assert!(matches!(outcome, SessionOutcome::Stopped(_)));
        assert!(output.ends_with("quantity must be positive\n"));
    }

    #[tokio::test]
    async fn test_amount_out_of_range_stops() {
        let store = Store::new(
            Arc::new(MemoryCatalogStore::new(Catalog::new(vec![StockItem::new(
                "Yacht",
                Money::new(dec!(75000000000000000000000000000)),
                5,
            )]))),
            Arc::new(MemoryOrderLedger::new()),
            PricingConfig::default(),
        );

        let (outcome, output) = run(&store, "1\n1\nUSD\n").await;
        assert!(matches!(outcome, SessionOutcome::Stopped(_)));
        assert!(output.ends_with("Amount out of range: scale overflowed\n"));
        assert_eq!(store.catalog().await.unwrap().items()[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_end_of_input_stops_cleanly() {
        let (outcome, _) = run(&store(), "").await;
        assert!(matches!(outcome, SessionOutcome::Stopped(_)));
    }
}
