//! # Invoice Presentation
//!
//! Turns an [`OrderLine`] into label/value rows. Both front ends render from
//! these rows: the console prints them as aligned text, the HTTP server
//! returns them as JSON.
//!
//! ```text
//! Item:           |  Widget
//! Item Price:     |  10.00
//! Quantity:       |  3
//! Total:          |  30.00
//! Discount:       |  3.00
//! VAT:            |  5.94
//! Net Total:      |  32.94
//! Currency:       |  EUR
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::OrderLine;

/// Row labels, in display order.
pub const INVOICE_LABELS: [&str; 8] = [
    "Item",
    "Item Price",
    "Quantity",
    "Total",
    "Discount",
    "VAT",
    "Net Total",
    "Currency",
];

/// One rendered invoice row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

impl DisplayRow {
    fn new(label: &str, value: impl ToString) -> Self {
        DisplayRow {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Display rows for an order, labels fixed as in [`INVOICE_LABELS`].
pub fn to_display_rows(line: &OrderLine) -> Vec<DisplayRow> {
    let [item, price, quantity, total, discount, vat, net, currency] = INVOICE_LABELS;
    vec![
        DisplayRow::new(item, &line.item_name),
        DisplayRow::new(price, line.unit_price),
        DisplayRow::new(quantity, line.quantity),
        DisplayRow::new(total, line.subtotal),
        DisplayRow::new(discount, line.discount),
        DisplayRow::new(vat, line.vat),
        DisplayRow::new(net, line.net_total),
        DisplayRow::new(currency, line.currency),
    ]
}

/// Console rendering: one `"{label}:<tab(s)>|  {value}"` line per row.
///
/// Short labels get two tabs so the bars line up at an 8-column tab stop.
pub fn invoice_lines(line: &OrderLine) -> Vec<String> {
    to_display_rows(line)
        .into_iter()
        .map(|row| {
            let tabs = if row.label.len() + 1 < 8 { "\t\t" } else { "\t" };
            format!("{}:{}|  {}", row.label, tabs, row.value)
        })
        .collect()
}
