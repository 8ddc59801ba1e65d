//! # Currency
//!
//! The three invoice currencies. Parsing is the single place where an
//! unknown code is rejected, so everything downstream works with a closed set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Invoice currency (ISO 4217 code).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro, the base currency of all catalog prices.
    Eur,
    /// Pound sterling.
    Gbp,
    /// US dollar.
    Usd,
}

impl Currency {
    /// All supported currencies, in the order offered to users.
    pub const ALL: [Currency; 3] = [Currency::Eur, Currency::Gbp, Currency::Usd];

    /// Returns the ISO code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
        }
    }

    /// Codes of all supported currencies (`["EUR", "GBP", "USD"]`).
    pub fn codes() -> Vec<&'static str> {
        Currency::ALL.iter().map(Currency::code).collect()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Codes are matched exactly after trimming: `"usd"` is not accepted, in
/// line with the ledger and the forms that always carry upper-case codes.
impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "USD" => Ok(Currency::Usd),
            other => Err(CoreError::UnsupportedCurrency(other.to_string())),
        }
    }
}
