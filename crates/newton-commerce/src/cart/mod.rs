//! Shopping cart module.
//!
//! Contains the cart state machine, derived pricing, change events and the
//! persisted store.

mod events;
mod pricing;
mod state;
mod store;

pub use events::{CartEvent, CartObserver, Notification, NotificationLevel};
pub use pricing::{CartTotals, PricingConfig};
pub use state::{CartAction, CartLineItem, CartState, BADGE_LIMIT};
pub use store::{CartStore, PersistedCart, RECORD_VERSION};
