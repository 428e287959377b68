//! Product snapshot supplied by the catalog.

use crate::ids::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as the cart sees it.
///
/// The cart keeps a copy taken when the product was added. Later catalog
/// changes do not reach lines that are already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Units available. Advisory only; the cart never reserves stock.
    pub stock: u32,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Catalog category slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Price before a sale, if the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Average review score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`.
    #[serde(default)]
    pub review_count: u32,
    /// Tags for filtering/search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Product {
    /// Create a product with no display metadata.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            description: None,
            category: None,
            image: None,
            original_price: None,
            rating: None,
            review_count: 0,
            tags: Vec::new(),
        }
    }

    /// Set the category slug.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the pre-sale price.
    pub fn with_original_price(mut self, original_price: Decimal) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Check if any units are available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if this product is on sale.
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|original| original > self.price)
            .unwrap_or(false)
    }

    /// Clamp a quantity picker value to `1..=stock`.
    ///
    /// The lower bound wins when the product is out of stock, so the picker
    /// never shows zero; the add button is disabled separately.
    pub fn clamp_quantity(&self, requested: i64) -> i64 {
        requested.min(i64::from(self.stock)).max(1)
    }
}
