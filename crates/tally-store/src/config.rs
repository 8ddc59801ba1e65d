//! # Tally Configuration
//!
//! File locations and pricing rules.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_STOCK_FILE=/srv/tally/stock.txt                              │
//! │     TALLY_ORDERS_FILE=/srv/tally/orders.txt                            │
//! │     TALLY_VAT_RATE=0.20                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TALLY_CONFIG, or                                                  │
//! │     ~/.config/tally-pos/tally.toml (Linux)                             │
//! │     ~/Library/Application Support/com.tally.pos/tally.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     stock.txt / orders.txt in the working directory, VAT 22%           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [files]
//! stock = "data/stock.txt"
//! orders = "data/orders.txt"
//!
//! [pricing]
//! vat_rate = "0.22"
//! decimal_places = 2
//! discount_tiers = [
//!     { threshold = "50", rate = "0.20" },
//!     { threshold = "20", rate = "0.10" },
//! ]
//!
//! [pricing.rates]
//! EUR = "1.0"
//! GBP = "0.88"
//! USD = "1.09"
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tally_core::{Currency, DiscountTier, PricingConfig};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "TALLY_CONFIG";

// =============================================================================
// File Settings
// =============================================================================

/// Where the stock file and the order ledger live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_stock_file")]
    pub stock: PathBuf,

    #[serde(default = "default_orders_file")]
    pub orders: PathBuf,
}

fn default_stock_file() -> PathBuf {
    PathBuf::from("stock.txt")
}

fn default_orders_file() -> PathBuf {
    PathBuf::from("orders.txt")
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            stock: default_stock_file(),
            orders: default_orders_file(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Pricing rules as written in the config file.
///
/// Currency codes are kept as strings here and checked in
/// [`TallyConfig::validate`], so an unknown code is reported by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,

    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    #[serde(default = "default_discount_tiers")]
    pub discount_tiers: Vec<DiscountTier>,

    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, Decimal>,
}

fn default_vat_rate() -> Decimal {
    PricingConfig::default().vat_rate
}

fn default_decimal_places() -> u32 {
    tally_core::DEFAULT_DECIMAL_PLACES
}

fn default_discount_tiers() -> Vec<DiscountTier> {
    PricingConfig::default().discount_tiers().to_vec()
}

fn default_rates() -> BTreeMap<String, Decimal> {
    PricingConfig::default()
        .rates
        .into_iter()
        .map(|(currency, rate)| (currency.code().to_string(), rate))
        .collect()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            vat_rate: default_vat_rate(),
            decimal_places: default_decimal_places(),
            discount_tiers: default_discount_tiers(),
            rates: default_rates(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Tally configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub files: FileSettings,

    #[serde(default)]
    pub pricing: PricingSettings,
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$TALLY_CONFIG`, else the platform
    ///    config dir). A missing file is not an error.
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks value ranges and currency codes.
    pub fn validate(&self) -> StoreResult<()> {
        let pricing = &self.pricing;

        if pricing.vat_rate.is_sign_negative() {
            return Err(StoreError::InvalidConfig(format!(
                "vat_rate must not be negative, got {}",
                pricing.vat_rate
            )));
        }

        if pricing.decimal_places > 10 {
            return Err(StoreError::InvalidConfig(format!(
                "decimal_places must be at most 10, got {}",
                pricing.decimal_places
            )));
        }

        for tier in &pricing.discount_tiers {
            if tier.rate.is_sign_negative() || tier.rate > Decimal::ONE {
                return Err(StoreError::InvalidConfig(format!(
                    "discount rate must be between 0 and 1, got {}",
                    tier.rate
                )));
            }
        }

        for (code, rate) in &pricing.rates {
            code.parse::<Currency>()?;
            if *rate <= Decimal::ZERO {
                return Err(StoreError::InvalidConfig(format!(
                    "rate for {code} must be positive, got {rate}"
                )));
            }
        }

        Ok(())
    }

    /// Builds the pricing engine's configuration.
    pub fn pricing_config(&self) -> StoreResult<PricingConfig> {
        let pricing = &self.pricing;
        let rates = pricing
            .rates
            .iter()
            .map(|(code, rate)| Ok((code.parse::<Currency>()?, *rate)))
            .collect::<StoreResult<BTreeMap<_, _>>>()?;

        Ok(PricingConfig::new(
            pricing.vat_rate,
            pricing.discount_tiers.clone(),
            rates,
            pricing.decimal_places,
        ))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup` (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("TALLY_STOCK_FILE") {
            debug!(path = %path, "Overriding stock file from environment");
            self.files.stock = PathBuf::from(path);
        }

        if let Some(path) = lookup("TALLY_ORDERS_FILE") {
            debug!(path = %path, "Overriding orders file from environment");
            self.files.orders = PathBuf::from(path);
        }

        if let Some(rate) = lookup("TALLY_VAT_RATE") {
            match rate.trim().parse::<Decimal>() {
                Ok(parsed) => self.pricing.vat_rate = parsed,
                Err(_) => warn!(rate = %rate, "Ignoring unparseable TALLY_VAT_RATE"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "tally", "pos")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }
}
