//! # Catalog
//!
//! The in-memory stock list and the operations an order needs on it.
//!
//! ## Ownership
//! A `Catalog` is loaded wholesale at the start of an operation, mutated in
//! place while the order is priced, and written back wholesale. Nothing else
//! holds a reference to it in the meantime, so plain `&mut` is enough.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::StockItem;

/// Ordered list of stock items. Position is identity: item `i` is the
/// `i`-th non-blank line of the stock file and is shown to users as `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<StockItem>,
}

impl Catalog {
    /// Creates a catalog from items in file order.
    pub fn new(items: Vec<StockItem>) -> Self {
        Catalog { items }
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, or `RecordNotFound`.
    pub fn get(&self, index: usize) -> CoreResult<&StockItem> {
        self.items
            .get(index)
            .ok_or_else(|| CoreError::not_found("Item", index.saturating_add(1)))
    }

    /// Index of the first item called `name` (exact match).
    pub fn find_index_by_name(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// Adds `delta` to the item's quantity. Negative for sales.
    ///
    /// There is no floor at zero: callers check
    /// [`has_sufficient_quantity`](Self::has_sufficient_quantity) first.
    pub fn adjust_quantity(&mut self, index: usize, delta: i64) -> CoreResult<()> {
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| CoreError::not_found("Item", index.saturating_add(1)))?;
        item.quantity = item
            .quantity
            .checked_add(delta)
            .ok_or(CoreError::AmountOverflow {
                operation: "stock adjustment",
            })?;
        Ok(())
    }

    /// True iff `requested` units of the item are on hand. Unknown items
    /// have nothing on hand.
    pub fn has_sufficient_quantity(&self, index: usize, requested: i64) -> bool {
        self.items
            .get(index)
            .map(|item| requested <= item.quantity)
            .unwrap_or(false)
    }

    /// Numbered listing for item selection: `"1 : Widget"`, `"2 : Gadget"`.
    pub fn item_list(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{} : {}", idx + 1, item.name))
            .collect()
    }
}

impl From<Vec<StockItem>> for Catalog {
    fn from(items: Vec<StockItem>) -> Self {
        Catalog::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal_macros::dec;

    fn sample() -> Catalog {
        Catalog::new(vec![
            StockItem::new("Widget", Money::new(dec!(10.00)), 5),
            StockItem::new("Gadget", Money::new(dec!(2.50)), 0),
        ])
    }

    #[test]
    fn test_find_index_by_name() {
        let catalog = sample();
        assert_eq!(catalog.find_index_by_name("Widget"), Some(0));
        assert_eq!(catalog.find_index_by_name("Gadget"), Some(1));
        assert_eq!(catalog.find_index_by_name("widget"), None);
    }

    #[test]
    fn test_adjust_quantity() {
        let mut catalog = sample();
        catalog.adjust_quantity(0, -3).unwrap();
        assert_eq!(catalog.items()[0].quantity, 2);

        // no floor: the caller is responsible for checking stock
        catalog.adjust_quantity(1, -1).unwrap();
        assert_eq!(catalog.items()[1].quantity, -1);

        assert!(matches!(
            catalog.adjust_quantity(9, 1),
            Err(CoreError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_has_sufficient_quantity() {
        let catalog = sample();
        assert!(catalog.has_sufficient_quantity(0, 5));
        assert!(!catalog.has_sufficient_quantity(0, 6));
        assert!(catalog.has_sufficient_quantity(1, 0));
        assert!(!catalog.has_sufficient_quantity(1, 1));
        assert!(!catalog.has_sufficient_quantity(7, 1));
    }

    #[test]
    fn test_item_list() {
        assert_eq!(sample().item_list(), vec!["1 : Widget", "2 : Gadget"]);
        assert!(Catalog::default().item_list().is_empty());
    }

    #[test]
    fn test_get_out_of_range_reports_item_number() {
        let err = sample().get(2).unwrap_err();
        assert_eq!(err.to_string(), "Item not found: 3");
    }

    #[test]
    fn test_extreme_indexes_and_quantities() {
        let mut catalog = sample();

        let err = catalog.get(usize::MAX).unwrap_err();
        assert_eq!(err.to_string(), format!("Item not found: {}", usize::MAX));
        assert!(catalog.adjust_quantity(usize::MAX, -1).is_err());
        assert!(!catalog.has_sufficient_quantity(usize::MAX, 1));

        assert!(matches!(
            catalog.adjust_quantity(0, i64::MAX),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert_eq!(catalog.items()[0].quantity, 5);
    }
}
