//! Shopping cart domain for the Newton storefront.
//!
//! This crate holds the one stateful piece of the storefront, the shopper's
//! cart:
//!
//! - **Catalog**: the product snapshot the cart stores per line
//! - **Cart**: line items, the transition function, derived totals, change
//!   events and the persisted [`CartStore`](cart::CartStore)
//! - **Money**: exact decimal amounts, rounded only for display
//!
//! # Example
//!
//! ```rust
//! use newton_commerce::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::with_defaults(MemoryStore::new());
//! let kit = Product::new("arduino-kit", "Arduino Starter Kit", Decimal::new(2000, 2), 5);
//!
//! cart.add_item(kit, 2);
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.grand_total().display(), "$49.19");
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub use error::CommerceError;
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::Product;

    // Cart
    pub use crate::cart::{
        CartAction, CartEvent, CartLineItem, CartObserver, CartState, CartStore, CartTotals,
        Notification, NotificationLevel, PricingConfig,
    };

    pub use crate::config::StoreConfig;

    // Storage backends
    pub use newton_cache::{FileStore, KvStore, MemoryStore};
}
