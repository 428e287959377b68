//! Cart store configuration.

use crate::cart::PricingConfig;
use crate::error::CommerceError;
use crate::money::Currency;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Storage key the storefront has always written its cart under.
pub const DEFAULT_STORAGE_KEY: &str = "newtonbotics-cart";

/// Configuration for a [`CartStore`](crate::cart::CartStore).
///
/// ```toml
/// storage_key = "newtonbotics-cart"
/// currency = "USD"
///
/// [pricing]
/// free_shipping_threshold = "50"
/// flat_shipping_fee = "5.99"
/// tax_rate = "0.08"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the persisted cart record.
    pub storage_key: String,
    /// Currency totals are reported in.
    pub currency: Currency,
    /// Shipping and tax rules.
    pub pricing: PricingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: Currency::USD,
            pricing: PricingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load config from a file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| CommerceError::Config(format!("{}: {}", path.display(), e)))?;
            config.check()?;
            config
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(path = %path.display(), "loaded cart store config");
        Ok(config)
    }

    /// Parse TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), CommerceError> {
        if self.storage_key.trim().is_empty() {
            return Err(CommerceError::Config("storage_key must not be empty".into()));
        }
        let p = &self.pricing;
        if p.free_shipping_threshold.is_sign_negative()
            || p.flat_shipping_fee.is_sign_negative()
            || p.tax_rate.is_sign_negative()
        {
            return Err(CommerceError::Config(
                "pricing values must not be negative".into(),
            ));
        }
        Ok(())
    }
}
