//! # Pricing Engine
//!
//! Discount, VAT and currency conversion for a single order line.
//!
//! ## Invoice Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  compute_invoice(catalog, item, qty, ccy)               │
//! │                                                                         │
//! │  unit_price ─────────────────────────────────────────────┐             │
//! │      │ × qty                                              │             │
//! │      ▼                                                    │             │
//! │  subtotal ───────────────────────────────────────────────┤             │
//! │      │ discount tiers (>50 → 20%, >20 → 10%, rounded)     │             │
//! │      ▼                                                    │             │
//! │  discount ───────────────────────────────────────────────┤  convert    │
//! │      │ subtotal − discount = gross                        │  each value │
//! │      ▼                                                    │  × FX rate  │
//! │  vat = gross × 0.22 (unrounded) ─────────────────────────┤  round 2dp  │
//! │      │ gross + vat                                        │             │
//! │      ▼                                                    │             │
//! │  net_total ──────────────────────────────────────────────┘             │
//! │                                                                         │
//! │  Side effect: catalog[item].quantity -= qty                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All five values are converted independently from their exact base-currency
//! amounts. Net total is NOT re-derived from the rounded parts, so
//! `discount + vat` may differ from `net_total − subtotal` by a cent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::currency::Currency;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PricingResult;
use crate::DEFAULT_DECIMAL_PLACES;

// =============================================================================
// Configuration
// =============================================================================

/// One step of the tiered discount: amounts strictly above `threshold` get
/// `rate` off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl DiscountTier {
    pub const fn new(threshold: Decimal, rate: Decimal) -> Self {
        DiscountTier { threshold, rate }
    }
}

/// Rates and rules the pricing engine works from.
///
/// Passed explicitly into every calculation so tests and deployments can
/// override any value without touching process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// VAT rate applied to the discounted amount (0.22 = 22%).
    pub vat_rate: Decimal,

    /// Discount tiers. Evaluation order is by descending threshold
    /// regardless of the order given here.
    discount_tiers: Vec<DiscountTier>,

    /// Conversion rate from the base currency (EUR) per currency.
    pub rates: BTreeMap<Currency, Decimal>,

    /// Places every converted amount is rounded to.
    pub decimal_places: u32,
}

impl Default for PricingConfig {
    /// ## Default Values
    /// - VAT: 22%
    /// - Discount: >50 → 20%, >20 → 10%
    /// - Rates: EUR 1.0, GBP 0.88, USD 1.09
    /// - 2 decimal places
    fn default() -> Self {
        let rates = BTreeMap::from([
            (Currency::Eur, Decimal::new(10, 1)),
            (Currency::Gbp, Decimal::new(88, 2)),
            (Currency::Usd, Decimal::new(109, 2)),
        ]);
        PricingConfig::new(
            Decimal::new(22, 2),
            vec![
                DiscountTier::new(Decimal::from(50), Decimal::new(20, 2)),
                DiscountTier::new(Decimal::from(20), Decimal::new(10, 2)),
            ],
            rates,
            DEFAULT_DECIMAL_PLACES,
        )
    }
}

impl PricingConfig {
    /// Creates a pricing configuration. Tiers are sorted highest threshold
    /// first.
    pub fn new(
        vat_rate: Decimal,
        mut discount_tiers: Vec<DiscountTier>,
        rates: BTreeMap<Currency, Decimal>,
        decimal_places: u32,
    ) -> Self {
        discount_tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        PricingConfig {
            vat_rate,
            discount_tiers,
            rates,
            decimal_places,
        }
    }

    /// Discount tiers, highest threshold first.
    pub fn discount_tiers(&self) -> &[DiscountTier] {
        &self.discount_tiers
    }

    /// Sets the VAT rate.
    pub fn with_vat_rate(mut self, vat_rate: Decimal) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    /// Sets the conversion rate for one currency.
    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    /// Conversion rate for `currency`.
    pub fn rate(&self, currency: Currency) -> CoreResult<Decimal> {
        self.rates
            .get(&currency)
            .copied()
            .ok_or_else(|| CoreError::UnsupportedCurrency(currency.to_string()))
    }
}

// =============================================================================
// Pricing Functions
// =============================================================================

/// Converts a base-currency amount into `currency`, rounding half-to-even
/// to `dp` places.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::{convert_currency, Currency, Money, PricingConfig};
///
/// let config = PricingConfig::default();
/// let usd = convert_currency(&config, Money::new(Decimal::new(1000, 2)), Currency::Usd, 2).unwrap();
/// assert_eq!(usd.to_string(), "10.90");
/// ```
pub fn convert_currency(
    config: &PricingConfig,
    amount: Money,
    currency: Currency,
    dp: u32,
) -> CoreResult<Money> {
    let rate = config.rate(currency)?;
    Ok(amount.scale(rate)?.round_dp(dp))
}

/// Same as [`convert_currency`] for a currency code that has not been parsed
/// yet. Unknown codes fail with `UnsupportedCurrency`.
pub fn convert_currency_code(
    config: &PricingConfig,
    amount: Money,
    code: &str,
    dp: u32,
) -> CoreResult<Money> {
    convert_currency(config, amount, code.parse()?, dp)
}

/// Tiered discount on `amount`.
///
/// Thresholds are exclusive: exactly 20.00 gets no discount, exactly 50.00
/// gets the 10% tier.
pub fn compute_discount(config: &PricingConfig, amount: Money) -> CoreResult<Money> {
    match config
        .discount_tiers
        .iter()
        .find(|tier| amount.amount() > tier.threshold)
    {
        Some(tier) => Ok(amount.scale(tier.rate)?.round_dp(config.decimal_places)),
        None => Ok(Money::zero()),
    }
}

/// VAT on `amount`. Left unrounded; rounding happens at conversion.
pub fn compute_vat(config: &PricingConfig, amount: Money) -> CoreResult<Money> {
    amount.scale(config.vat_rate)
}

/// Prices `quantity` units of the item at `item_index` in `currency` and
/// takes them out of stock.
///
/// ## Caller Contract
/// - Check [`Catalog::has_sufficient_quantity`] first; this function does not.
/// - Not idempotent: every call decrements stock again.
///
/// ## Errors
/// - `RecordNotFound` if `item_index` is outside the catalog
/// - `UnsupportedCurrency` if `currency` has no configured rate
/// - `AmountOverflow` if any amount leaves the `Decimal` range
///
/// On error the catalog is left untouched.
pub fn compute_invoice(
    config: &PricingConfig,
    catalog: &mut Catalog,
    item_index: usize,
    quantity: i64,
    currency: Currency,
) -> CoreResult<PricingResult> {
    let price = catalog.get(item_index)?.unit_price;

    let subtotal = price.multiply_quantity(quantity)?;
    let discount = compute_discount(config, subtotal)?;
    let gross = subtotal.checked_sub(discount)?;
    let vat = compute_vat(config, gross)?;
    let net_total = gross.checked_add(vat)?;

    let dp = config.decimal_places;
    let result = PricingResult {
        unit_price: convert_currency(config, price, currency, dp)?,
        subtotal: convert_currency(config, subtotal, currency, dp)?,
        discount: convert_currency(config, discount, currency, dp)?,
        vat: convert_currency(config, vat, currency, dp)?,
        net_total: convert_currency(config, net_total, currency, dp)?,
    };

    // every fallible step is done; only now touch stock
    let delta = quantity
        .checked_neg()
        .ok_or(CoreError::AmountOverflow {
            operation: "stock adjustment",
        })?;
    catalog.adjust_quantity(item_index, delta)?;
    Ok(result)
}

// =============================================================================
// Unit Tests
// =============================================================================
