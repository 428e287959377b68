//! Cart pricing calculations.
//!
//! Every figure is derived from the current line items on demand; nothing
//! here is stored alongside the cart.

use crate::cart::CartState;
use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipping and tax rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged below the threshold.
    pub flat_shipping_fee: Decimal,
    /// Tax rate applied to the subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(50, 0),
            flat_shipping_fee: Decimal::new(599, 2),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

impl PricingConfig {
    /// Shipping for a given subtotal.
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Tax for a given subtotal, unrounded.
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        subtotal.saturating_mul(self.tax_rate)
    }

    /// How much more must be spent for free shipping, if anything.
    pub fn free_shipping_remaining(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.free_shipping_threshold)
            .then(|| self.free_shipping_threshold.saturating_sub(subtotal))
    }
}

/// Complete pricing breakdown for a cart at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Total units in the cart.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Tax amount.
    pub tax: Money,
    /// subtotal + shipping + tax.
    pub grand_total: Money,
}

impl CartTotals {
    /// Derive the totals for `state`.
    ///
    /// Sums saturate at the bounds of `Decimal`.
    pub fn compute(state: &CartState, pricing: &PricingConfig, currency: Currency) -> Self {
        let subtotal = state.subtotal();
        let shipping = pricing.shipping_for(subtotal);
        let tax = pricing.tax_for(subtotal);
        Self {
            item_count: state.item_count(),
            subtotal: Money::new(subtotal, currency),
            shipping: Money::new(shipping, currency),
            tax: Money::new(tax, currency),
            grand_total: Money::new(
                subtotal.saturating_add(shipping).saturating_add(tax),
                currency,
            ),
        }
    }

    /// Check if shipping is free.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Shipping as shown in the order summary ("Free" or an amount).
    pub fn shipping_label(&self) -> String {
        if self.has_free_shipping() {
            "Free".to_string()
        } else {
            self.shipping.display()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartAction, CartState};
    use crate::catalog::Product;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cart_with_subtotal(subtotal: &str) -> CartState {
        let mut state = CartState::new();
        state.apply(CartAction::Add {
            product: Product::new("p1", "Widget", dec(subtotal), 10),
            quantity: 1,
        });
        state
    }

    fn totals(state: &CartState) -> CartTotals {
        CartTotals::compute(state, &PricingConfig::default(), Currency::USD)
    }

    #[test]
    fn test_shipping_threshold() {
        let config = PricingConfig::default();
        assert_eq!(config.shipping_for(dec("49.99")), dec("5.99"));
        assert_eq!(config.shipping_for(dec("50.00")), Decimal::ZERO);
        assert_eq!(config.shipping_for(dec("50.01")), Decimal::ZERO);
    }

    #[test]
    fn test_tax() {
        let config = PricingConfig::default();
        assert_eq!(config.tax_for(dec("100")), dec("8.00"));
    }

    #[test]
    fn test_grand_total_is_exact_sum() {
        let t = totals(&cart_with_subtotal("40"));
        assert_eq!(t.subtotal.amount, dec("40"));
        assert_eq!(t.shipping.amount, dec("5.99"));
        assert_eq!(t.tax.amount, dec("3.20"));
        assert_eq!(t.grand_total.amount, dec("49.19"));
        assert_eq!(t.grand_total.display(), "$49.19");
    }

    #[test]
    fn test_rounding_only_at_display() {
        // 12.34 * 0.08 = 0.9872; the grand total keeps the fraction.
        let t = totals(&cart_with_subtotal("12.34"));
        assert_eq!(t.tax.amount, dec("0.9872"));
        assert_eq!(t.grand_total.amount, dec("19.3172"));
        assert_eq!(t.tax.display(), "$0.99");
        assert_eq!(t.grand_total.display(), "$19.32");
    }

    #[test]
    fn test_empty_cart_totals() {
        let t = totals(&CartState::new());
        assert_eq!(t.item_count, 0);
        assert!(t.subtotal.is_zero());
        assert!(t.tax.is_zero());
        // Shipping still applies below the threshold, as in the storefront.
        assert_eq!(t.shipping.amount, dec("5.99"));
        assert_eq!(t.shipping_label(), "$5.99");
    }

    #[test]
    fn test_free_shipping_label_and_remaining() {
        let config = PricingConfig::default();
        assert_eq!(config.free_shipping_remaining(dec("35")), Some(dec("15")));
        assert_eq!(config.free_shipping_remaining(dec("50")), None);

        let t = totals(&cart_with_subtotal("75"));
        assert!(t.has_free_shipping());
        assert_eq!(t.shipping_label(), "Free");
    }

    #[test]
    fn test_grand_total_saturates_near_decimal_max() {
        let state = cart_with_subtotal(&Decimal::MAX.to_string());
        assert!(state.validate().is_ok());

        let t = totals(&state);
        assert_eq!(t.subtotal.amount, Decimal::MAX);
        assert!(t.has_free_shipping());
        assert_eq!(t.grand_total.amount, Decimal::MAX);
    }

    #[test]
    fn test_custom_config() {
        let config = PricingConfig {
            free_shipping_threshold: dec("100"),
            flat_shipping_fee: dec("9.50"),
            tax_rate: dec("0.2"),
        };
        let t = CartTotals::compute(&cart_with_subtotal("60"), &config, Currency::EUR);
        assert_eq!(t.shipping.amount, dec("9.50"));
        assert_eq!(t.tax.amount, dec("12"));
        assert_eq!(t.grand_total.amount, dec("81.50"));
        assert_eq!(t.grand_total.currency, Currency::EUR);
    }
}
