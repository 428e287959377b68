//! Persisted cart store.
//!
//! [`CartStore`] owns one [`CartState`]. Each mutation goes through
//! [`CartState::apply`], after which the state is written to the key-value
//! backend and observers are told about the change. Writes are best effort:
//! a failed write is logged and the in-memory cart carries on as the source
//! of truth for the rest of the session.

use crate::cart::{
    CartAction, CartEvent, CartLineItem, CartObserver, CartState, CartTotals, PricingConfig,
};
use crate::catalog::Product;
use crate::config::StoreConfig;
use crate::error::CommerceError;
use crate::money::Money;
use newton_cache::{Cache, KvStore, MemoryStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Version written into every persisted cart record.
pub const RECORD_VERSION: u32 = 0;

/// The record stored under the configured key.
///
/// Serialized as `{"state": {"items": [...]}, "version": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCart {
    pub state: CartState,
    pub version: u32,
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    state: &'a CartState,
    version: u32,
}

/// The shopper's cart, persisted to a key-value backend.
///
/// ```rust,ignore
/// let mut cart = CartStore::open(FileStore::open("./data")?, StoreConfig::default());
/// cart.add_item(product, 2);
/// println!("{}", cart.grand_total());
/// ```
pub struct CartStore<S: KvStore = MemoryStore> {
    state: CartState,
    cache: Cache<S>,
    config: StoreConfig,
    observers: Vec<Box<dyn CartObserver>>,
    persist_failures: u64,
}

impl<S: KvStore> CartStore<S> {
    /// Open a store, rehydrating from the backend.
    ///
    /// A missing, unreadable or invalid record yields an empty cart.
    #[instrument(level = "debug", skip_all, fields(key = %config.storage_key))]
    pub fn open(store: S, config: StoreConfig) -> Self {
        let cache = Cache::new(store);
        let state = rehydrate(&cache, &config.storage_key);
        debug!(lines = state.line_count(), "cart store opened");
        Self {
            state,
            cache,
            config,
            observers: Vec::new(),
            persist_failures: 0,
        }
    }

    /// Open a store with the default configuration.
    pub fn with_defaults(store: S) -> Self {
        Self::open(store, StoreConfig::default())
    }

    /// Register an observer for every subsequent change.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        self.state.items()
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &S {
        self.cache.store()
    }

    /// Number of writes that failed since the store was opened.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing line if the product is already in the cart.
    /// Stock is not checked here; cap the quantity with
    /// [`Product::clamp_quantity`] first.
    #[instrument(level = "debug", skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product, quantity: i64) {
        self.dispatch(CartAction::Add { product, quantity });
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: Product) {
        self.add_item(product, 1);
    }

    /// Remove a product's line. Unknown IDs are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, product_id: &str) {
        self.dispatch(CartAction::Remove {
            product_id: product_id.into(),
        });
    }

    /// Set a line's quantity; zero or below removes the line.
    #[instrument(level = "debug", skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        });
    }

    /// Empty the cart.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Apply an action, persist, and notify observers of any change.
    ///
    /// The state is written after every action, changed or not, so the
    /// stored record always mirrors memory.
    pub fn dispatch(&mut self, action: CartAction) -> Option<CartEvent> {
        let event = self.state.apply(action);
        self.persist();

        if let Some(event) = &event {
            debug!(?event, "cart changed");
            for observer in &mut self.observers {
                observer.on_event(event, &self.state);
            }
        }
        event
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> i64 {
        self.state.item_count()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.state.line_count()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.money(self.state.subtotal())
    }

    /// Shipping for the current subtotal.
    pub fn shipping(&self) -> Money {
        self.money(self.pricing().shipping_for(self.state.subtotal()))
    }

    /// Tax on the current subtotal.
    pub fn tax(&self) -> Money {
        self.money(self.pricing().tax_for(self.state.subtotal()))
    }

    /// subtotal + shipping + tax.
    pub fn grand_total(&self) -> Money {
        self.totals().grand_total
    }

    /// Same as [`grand_total`](Self::grand_total).
    pub fn total_price(&self) -> Money {
        self.grand_total()
    }

    /// All derived figures at once.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.state, self.pricing(), self.config.currency)
    }

    /// Amount left to spend before shipping becomes free.
    pub fn free_shipping_remaining(&self) -> Option<Money> {
        self.pricing()
            .free_shipping_remaining(self.state.subtotal())
            .map(|amount| self.money(amount))
    }

    /// Whether a line can be incremented without exceeding its stock.
    pub fn can_increment(&self, product_id: &str) -> bool {
        self.state.can_increment(product_id)
    }

    /// Navigation badge text.
    pub fn badge_label(&self) -> Option<String> {
        self.state.badge_label()
    }

    fn pricing(&self) -> &PricingConfig {
        &self.config.pricing
    }

    fn money(&self, amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, self.config.currency)
    }

    fn persist(&mut self) {
        let record = PersistedCartRef {
            state: &self.state,
            version: RECORD_VERSION,
        };
        if let Err(e) = self.cache.set(&self.config.storage_key, &record) {
            self.persist_failures += 1;
            warn!(
                key = %self.config.storage_key,
                error = %e,
                "failed to persist cart; keeping in-memory state"
            );
        }
    }
}

fn rehydrate<S: KvStore>(cache: &Cache<S>, key: &str) -> CartState {
    match load_record(cache, key) {
        Ok(Some(state)) => state,
        Ok(None) => CartState::new(),
        Err(e) => {
            warn!(key, error = %e, "discarding persisted cart");
            CartState::new()
        }
    }
}

fn load_record<S: KvStore>(cache: &Cache<S>, key: &str) -> Result<Option<CartState>, CommerceError> {
    let Some(record) = cache.get::<PersistedCart>(key)? else {
        return Ok(None);
    };
    if record.version != RECORD_VERSION {
        return Err(CommerceError::UnsupportedVersion {
            found: record.version,
            expected: RECORD_VERSION,
        });
    }
    record.state.validate()?;
    Ok(Some(record.state))
}
