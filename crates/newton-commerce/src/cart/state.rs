//! Cart state and its transitions.
//!
//! [`CartState::apply`] is the only way the line items change. It touches
//! nothing but the state itself, so every transition can be exercised
//! without a storage backend.

use crate::cart::CartEvent;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Highest count the navigation badge prints before switching to "99+".
pub const BADGE_LIMIT: i64 = 99;

/// One product in the cart and how many units of it are wanted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Product snapshot taken when the line was created.
    pub product: Product,
    /// Units wanted. Always at least 1 while the line exists.
    pub quantity: i64,
}

impl CartLineItem {
    /// Create a line item.
    pub fn new(product: Product, quantity: i64) -> Self {
        Self { product, quantity }
    }

    /// Price of the line (`price * quantity`), unrounded.
    ///
    /// Saturates at the bounds of `Decimal` instead of overflowing.
    pub fn line_total(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity))
    }

    /// Price of the line, or `None` if it does not fit in a `Decimal`.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Product ID of the line.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }
}

/// An operation on the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `quantity` units of `product`, merging into an existing line.
    Add { product: Product, quantity: i64 },
    /// Remove the line for a product.
    Remove { product_id: ProductId },
    /// Replace a line's quantity; zero or below removes the line.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Remove every line.
    Clear,
}

/// The ordered list of line items, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from existing lines, checking the cart invariants.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CommerceError> {
        let state = Self { items };
        state.validate()?;
        Ok(state)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Find the line for a product.
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.product.id.as_str() == product_id)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of `price * quantity` over all lines, unrounded.
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.line_total()))
    }

    fn checked_subtotal(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.checked_line_total()?))
    }

    /// Whether the "+" control for a line should be enabled.
    ///
    /// False once the line reaches the snapshot's stock, or if the product
    /// is not in the cart.
    pub fn can_increment(&self, product_id: &str) -> bool {
        self.get(product_id)
            .map(|line| line.quantity < i64::from(line.product.stock))
            .unwrap_or(false)
    }

    /// Text for the navigation badge, or `None` when the cart is empty.
    pub fn badge_label(&self) -> Option<String> {
        match self.item_count() {
            0 => None,
            n if n > BADGE_LIMIT => Some(format!("{}+", BADGE_LIMIT)),
            n => Some(n.to_string()),
        }
    }

    /// Apply an action, returning the resulting change.
    ///
    /// Returns `None` when the action leaves the cart as it was (unknown
    /// product ID, unchanged quantity, clearing an empty cart). Actions that
    /// would push the subtotal past what a `Decimal` can hold, or add a
    /// product with a negative price, are refused the same way.
    pub fn apply(&mut self, action: CartAction) -> Option<CartEvent> {
        match action {
            CartAction::Add { product, quantity } => self.add(product, quantity),
            CartAction::Remove { product_id } => self.remove(product_id.as_str()),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => self.update_quantity(product_id.as_str(), quantity),
            CartAction::Clear => self.clear(),
        }
    }

    /// Check the cart invariants: unique product IDs, positive quantities,
    /// non-negative prices and a subtotal that fits in a `Decimal`.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(CommerceError::InvalidCartState(format!(
                    "line {} has quantity {}",
                    item.product.id, item.quantity
                )));
            }
            if item.product.price < Decimal::ZERO {
                return Err(CommerceError::InvalidCartState(format!(
                    "line {} has negative price {}",
                    item.product.id, item.product.price
                )));
            }
            if !seen.insert(item.product.id.as_str()) {
                return Err(CommerceError::InvalidCartState(format!(
                    "duplicate line for {}",
                    item.product.id
                )));
            }
        }
        if self.checked_subtotal().is_none() {
            return Err(CommerceError::InvalidCartState(
                "subtotal out of range".to_string(),
            ));
        }
        Ok(())
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.product.id.as_str() == product_id)
    }

    fn add(&mut self, product: Product, quantity: i64) -> Option<CartEvent> {
        let Some(idx) = self.position(product.id.as_str()) else {
            // Nothing to merge a non-positive add into; negative prices are never stored.
            if quantity <= 0 || product.price < Decimal::ZERO {
                return None;
            }
            let event = CartEvent::ItemAdded {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity,
                line_quantity: quantity,
                merged: false,
            };
            self.items.push(CartLineItem::new(product, quantity));
            if self.checked_subtotal().is_none() {
                self.items.pop();
                return None;
            }
            return Some(event);
        };

        if quantity == 0 {
            return None;
        }

        let old_quantity = self.items.get(idx)?.quantity;
        let new_quantity = old_quantity.saturating_add(quantity);
        if new_quantity <= 0 {
            return self.remove(product.id.as_str());
        }
        if !self.set_quantity(idx, new_quantity) {
            return None;
        }

        let line = self.items.get(idx)?;
        if quantity < 0 {
            return Some(CartEvent::QuantityUpdated {
                product_id: product.id,
                quantity: new_quantity,
            });
        }

        // The existing snapshot is kept; only the quantity grows.
        Some(CartEvent::ItemAdded {
            product_id: product.id,
            name: line.product.name.clone(),
            quantity,
            line_quantity: new_quantity,
            merged: true,
        })
    }

    fn remove(&mut self, product_id: &str) -> Option<CartEvent> {
        let idx = self.position(product_id)?;
        let line = self.items.remove(idx);
        Some(CartEvent::ItemRemoved {
            product_id: line.product.id,
            name: line.product.name,
        })
    }

    fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let idx = self.position(product_id)?;
        if self.items.get(idx)?.quantity == quantity || !self.set_quantity(idx, quantity) {
            return None;
        }
        Some(CartEvent::QuantityUpdated {
            product_id: self.items.get(idx)?.product.id.clone(),
            quantity,
        })
    }

    /// Set a line's quantity, rolling back if the subtotal would overflow.
    fn set_quantity(&mut self, idx: usize, quantity: i64) -> bool {
        let Some(line) = self.items.get_mut(idx) else {
            return false;
        };
        let previous = std::mem::replace(&mut line.quantity, quantity);
        if self.checked_subtotal().is_some() {
            return true;
        }
        if let Some(line) = self.items.get_mut(idx) {
            line.quantity = previous;
        }
        false
    }

    fn clear(&mut self) -> Option<CartEvent> {
        if self.items.is_empty() {
            return None;
        }
        let removed_lines = self.items.len();
        self.items.clear();
        Some(CartEvent::Cleared { removed_lines })
    }
}
