//! # Line Formats
//!
//! Parsing and formatting of the two flat files.
//!
//! ```text
//! stock file                      ledger file (newest first)
//! ─────────────────────────       ─────────────────────────────────────────────
//! Widget,10.00,5                  Widget,3,EUR,10.00,30.00,3.00,5.94,32.94
//! Gadget,2.50,12                  Gadget,1,USD,2.72,2.72,0.00,0.60,3.32
//! ```
//!
//! Comma-separated, no header, no quoting. Fields are trimmed on read and
//! blank lines are skipped. Line numbers in errors are 1-based and count
//! blank lines, so they match what an editor shows.

use std::path::Path;

use tally_core::validation::validate_item_name;
use tally_core::{Catalog, Currency, Money, OrderLine, StockItem};

use crate::error::{StoreError, StoreResult};

const STOCK_FIELDS: usize = 3;
const ORDER_FIELDS: usize = 8;

/// Splits a line into trimmed fields, checking the field count.
fn split_fields<'a>(
    file: &Path,
    line_no: usize,
    line: &'a str,
    expected: usize,
) -> StoreResult<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(StoreError::malformed(
            file,
            line_no,
            format!("expected {expected} fields, got {}", fields.len()),
        ));
    }
    Ok(fields)
}

fn parse_money(file: &Path, line_no: usize, field: &str, raw: &str) -> StoreResult<Money> {
    raw.parse()
        .map_err(|_| StoreError::malformed(file, line_no, format!("{field} is not a number: '{raw}'")))
}

fn parse_quantity(file: &Path, line_no: usize, raw: &str) -> StoreResult<i64> {
    raw.parse()
        .map_err(|_| StoreError::malformed(file, line_no, format!("quantity is not an integer: '{raw}'")))
}

fn parse_name<'a>(file: &Path, line_no: usize, raw: &'a str) -> StoreResult<&'a str> {
    validate_item_name(raw)
        .map(|()| raw)
        .map_err(|err| StoreError::malformed(file, line_no, err.to_string()))
}

/// Non-blank lines with their 1-based line numbers.
fn records(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

// =============================================================================
// Stock File
// =============================================================================

/// Parses one `name,price,quantity` line.
pub fn parse_stock_line(file: &Path, line_no: usize, line: &str) -> StoreResult<StockItem> {
    let fields = split_fields(file, line_no, line, STOCK_FIELDS)?;
    let name = parse_name(file, line_no, fields[0])?;
    let unit_price = parse_money(file, line_no, "price", fields[1])?;
    let quantity = parse_quantity(file, line_no, fields[2])?;
    Ok(StockItem::new(name, unit_price, quantity))
}

/// Formats one stock line (no trailing newline).
pub fn format_stock_line(item: &StockItem) -> StoreResult<String> {
    validate_item_name(&item.name).map_err(tally_core::CoreError::from)?;
    Ok(format!("{},{},{}", item.name, item.unit_price, item.quantity))
}

/// Parses a whole stock file.
pub fn parse_catalog(file: &Path, contents: &str) -> StoreResult<Catalog> {
    records(contents)
        .map(|(line_no, line)| parse_stock_line(file, line_no, line))
        .collect::<StoreResult<Vec<_>>>()
        .map(Catalog::new)
}

/// Formats a whole stock file, one item per line.
pub fn format_catalog(catalog: &Catalog) -> StoreResult<String> {
    let mut out = String::new();
    for item in catalog.items() {
        out.push_str(&format_stock_line(item)?);
        out.push('\n');
    }
    Ok(out)
}

// =============================================================================
// Ledger File
// =============================================================================

/// Parses one
/// `itemName,quantity,currency,unitPrice,subtotal,discount,vat,netTotal` line.
pub fn parse_order_line(file: &Path, line_no: usize, line: &str) -> StoreResult<OrderLine> {
    let f = split_fields(file, line_no, line, ORDER_FIELDS)?;
    let currency: Currency = f[2]
        .parse()
        .map_err(|_| StoreError::malformed(file, line_no, format!("unknown currency: '{}'", f[2])))?;

    Ok(OrderLine {
        item_name: parse_name(file, line_no, f[0])?.to_string(),
        quantity: parse_quantity(file, line_no, f[1])?,
        currency,
        unit_price: parse_money(file, line_no, "unit price", f[3])?,
        subtotal: parse_money(file, line_no, "subtotal", f[4])?,
        discount: parse_money(file, line_no, "discount", f[5])?,
        vat: parse_money(file, line_no, "vat", f[6])?,
        net_total: parse_money(file, line_no, "net total", f[7])?,
    })
}

/// Formats one ledger line (no trailing newline).
pub fn format_order_line(order: &OrderLine) -> StoreResult<String> {
    validate_item_name(&order.item_name).map_err(tally_core::CoreError::from)?;
    Ok(format!(
        "{},{},{},{},{},{},{},{}",
        order.item_name,
        order.quantity,
        order.currency,
        order.unit_price,
        order.subtotal,
        order.discount,
        order.vat,
        order.net_total,
    ))
}

/// Parses a whole ledger file, newest first as stored.
pub fn parse_ledger(file: &Path, contents: &str) -> StoreResult<Vec<OrderLine>> {
    records(contents)
        .map(|(line_no, line)| parse_order_line(file, line_no, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn path() -> &'static Path {
        Path::new("test.txt")
    }

    #[test]
    fn test_parse_stock_trims_and_skips_blank_lines() {
        let catalog = parse_catalog(path(), " Widget , 10.00 , 5 \n\n  \nGadget,2.50,12\n").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].name, "Widget");
        assert_eq!(catalog.items()[0].unit_price, Money::new(dec!(10.00)));
        assert_eq!(catalog.items()[0].quantity, 5);
        assert_eq!(catalog.items()[1].name, "Gadget");
    }

    #[test]
    fn test_parse_stock_errors_carry_line_number() {
        let err = parse_catalog(path(), "Widget,10.00,5\n\nGadget,2.50\n").unwrap_err();
        match err {
            StoreError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            parse_catalog(path(), "Widget,ten,5\n"),
            Err(StoreError::MalformedRecord { .. })
        ));
        assert!(matches!(
            parse_catalog(path(), "Widget,10.00,5.5\n"),
            Err(StoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_parse_stock_rejects_blank_name() {
        let err = parse_catalog(path(), "Widget,10.00,5\n,1.00,3\n").unwrap_err();
        match err {
            StoreError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "name is required");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            parse_stock_line(path(), 1, "   ,1.00,3"),
            Err(StoreError::MalformedRecord { .. })
        ));
        assert!(matches!(
            parse_order_line(path(), 1, ",3,EUR,10.00,30.00,3.00,5.94,32.94"),
            Err(StoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_stock_file_reproduces_records() {
        let contents = "Widget,10.00,5\nGadget,2.50,12\n";
        let catalog = parse_catalog(path(), contents).unwrap();
        assert_eq!(format_catalog(&catalog).unwrap(), contents);
    }

    #[test]
    fn test_format_rejects_comma_in_name() {
        let item = StockItem::new("Widget, large", Money::new(dec!(1.00)), 1);
        assert!(matches!(
            format_stock_line(&item),
            Err(StoreError::Core(tally_core::CoreError::Validation(_)))
        ));
    }

    #[test]
    fn test_order_line_format_and_parse() {
        let line = "Widget,3,EUR,10.00,30.00,3.00,5.94,32.94";
        let order = parse_order_line(path(), 1, line).unwrap();
        assert_eq!(order.item_name, "Widget");
        assert_eq!(order.quantity, 3);
        assert_eq!(order.currency, Currency::Eur);
        assert_eq!(order.net_total, Money::new(dec!(32.94)));
        assert_eq!(format_order_line(&order).unwrap(), line);
    }

    #[test]
    fn test_parse_order_line_rejects_bad_records() {
        assert!(parse_order_line(path(), 1, "Widget,3,JPY,10.00,30.00,3.00,5.94,32.94").is_err());
        assert!(parse_order_line(path(), 1, "Widget,3,EUR,10.00,30.00,3.00,5.94").is_err());
        assert!(parse_order_line(path(), 1, "Widget,x,EUR,10.00,30.00,3.00,5.94,32.94").is_err());
    }

    #[test]
    fn test_parse_ledger_keeps_file_order() {
        let contents = "Gadget,1,USD,2.72,2.72,0.00,0.60,3.32\n\nWidget,3,EUR,10.00,30.00,3.00,5.94,32.94\n";
        let orders = parse_ledger(path(), contents).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].item_name, "Gadget");
        assert_eq!(orders[1].item_name, "Widget");
    }
}
