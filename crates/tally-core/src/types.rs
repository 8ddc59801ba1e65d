//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockItem     │   │  PricingResult  │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │──►│  unit_price     │──►│  item_name      │       │
//! │  │  unit_price     │   │  subtotal       │   │  quantity       │       │
//! │  │  quantity       │   │  discount       │   │  currency       │       │
//! │  └─────────────────┘   │  vat            │   │  + 5 amounts    │       │
//! │   (in a Catalog)       │  net_total      │   └─────────────────┘       │
//! │                        └─────────────────┘    (in the ledger)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Catalog items have no key of their own: an item is its position in the
//! stock file. Orders are identified by [`OrderId`], a sequence number that
//! stays stable because the ledger only grows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::currency::Currency;
use crate::money::Money;

// =============================================================================
// Stock Item
// =============================================================================

/// One line of the stock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    /// Display name, also the key orders refer back to.
    pub name: String,

    /// Unit price in the base currency (EUR).
    #[ts(type = "string")]
    pub unit_price: Money,

    /// Units on hand. Expected to be non-negative, not enforced.
    pub quantity: i64,
}

impl StockItem {
    /// Creates a stock item.
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        StockItem {
            name: name.into(),
            unit_price,
            quantity,
        }
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Invoice values for one order line, in the requested currency, each
/// rounded to the configured number of places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    #[ts(type = "string")]
    pub unit_price: Money,
    /// Unit price × quantity, before discount.
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub discount: Money,
    #[ts(type = "string")]
    pub vat: Money,
    /// Subtotal − discount + VAT.
    #[ts(type = "string")]
    pub net_total: Money,
}

// =============================================================================
// Order Line
// =============================================================================

/// A fulfilled order, as stored in the ledger.
///
/// Uses the snapshot pattern: the item name and prices are frozen at the time
/// of sale, so later catalog edits never change a past invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_name: String,
    pub quantity: i64,
    pub currency: Currency,
    #[ts(type = "string")]
    pub unit_price: Money,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub discount: Money,
    #[ts(type = "string")]
    pub vat: Money,
    #[ts(type = "string")]
    pub net_total: Money,
}

impl OrderLine {
    /// Freezes a pricing result into an order line.
    pub fn new(
        item_name: impl Into<String>,
        quantity: i64,
        currency: Currency,
        pricing: &PricingResult,
    ) -> Self {
        OrderLine {
            item_name: item_name.into(),
            quantity,
            currency,
            unit_price: pricing.unit_price,
            subtotal: pricing.subtotal,
            discount: pricing.discount,
            vat: pricing.vat,
            net_total: pricing.net_total,
        }
    }
}

// =============================================================================
// Order Id
// =============================================================================

/// Stable order identifier.
///
/// ## Numbering
/// ```text
///  ledger file (newest first)      OrderId
///  ───────────────────────────     ───────
///  Gadget,1,EUR,...                   3     ◄── just appended
///  Widget,2,USD,...                   2
///  Widget,3,EUR,...                   1     ◄── oldest
/// ```
/// The id of an order is its position counted from the bottom of the ledger,
/// so prepending new orders never renumbers existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderId(#[ts(type = "number")] pub u64);

impl OrderId {
    /// Position of this order in a newest-first list of `len` orders, or
    /// `None` if the id is out of range.
    pub fn position_in(&self, len: usize) -> Option<usize> {
        let id = usize::try_from(self.0).ok()?;
        if id == 0 || id > len {
            return None;
        }
        Some(len - id)
    }

    /// Id of the order at `position` in a newest-first list of `len` orders.
    pub fn at_position(position: usize, len: usize) -> OrderId {
        OrderId(len.saturating_sub(position) as u64)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(OrderId)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_id_positions() {
        // three orders, newest first
        assert_eq!(OrderId(3).position_in(3), Some(0));
        assert_eq!(OrderId(1).position_in(3), Some(2));
        assert_eq!(OrderId(0).position_in(3), None);
        assert_eq!(OrderId(4).position_in(3), None);
        assert_eq!(OrderId(1).position_in(0), None);

        assert_eq!(OrderId::at_position(0, 3), OrderId(3));
        assert_eq!(OrderId::at_position(2, 3), OrderId(1));
    }

    #[test]
    fn test_order_line_snapshot() {
        let pricing = PricingResult {
            unit_price: Money::new(dec!(10.00)),
            subtotal: Money::new(dec!(30.00)),
            discount: Money::new(dec!(3.00)),
            vat: Money::new(dec!(5.94)),
            net_total: Money::new(dec!(32.94)),
        };
        let line = OrderLine::new("Widget", 3, Currency::Eur, &pricing);
        assert_eq!(line.item_name, "Widget");
        assert_eq!(line.net_total, pricing.net_total);
        assert_eq!(line.currency, Currency::Eur);
    }

    #[test]
    fn test_order_line_json_shape() {
        let line = OrderLine {
            item_name: "Widget".to_string(),
            quantity: 1,
            currency: Currency::Gbp,
            unit_price: Money::new(dec!(8.80)),
            subtotal: Money::new(dec!(8.80)),
            discount: Money::new(dec!(0.00)),
            vat: Money::new(dec!(1.94)),
            net_total: Money::new(dec!(10.74)),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["itemName"], "Widget");
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["netTotal"], "10.74");
    }

    #[test]
    fn test_order_id_is_a_plain_number() {
        assert_eq!(serde_json::to_string(&OrderId(7)).unwrap(), "7");
        assert_eq!(serde_json::from_str::<OrderId>("7").unwrap(), OrderId(7));
        assert_eq!(OrderId::inline(), "number");
    }
}
