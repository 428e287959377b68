//! Cart change events and observers.

use crate::cart::CartState;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A completed change to the cart.
///
/// Produced by [`CartState::apply`] only when the state actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// Units of a product were added, either as a new line or merged into
    /// an existing one.
    ItemAdded {
        product_id: ProductId,
        name: String,
        /// Units added by this call.
        quantity: i64,
        /// Quantity of the line after the add.
        line_quantity: i64,
        /// Whether the units were merged into an existing line.
        merged: bool,
    },
    /// A line's quantity was replaced.
    QuantityUpdated {
        product_id: ProductId,
        quantity: i64,
    },
    /// A line was removed.
    ItemRemoved { product_id: ProductId, name: String },
    /// Every line was removed.
    Cleared { removed_lines: usize },
}

impl CartEvent {
    /// Product the event concerns, if it concerns a single one.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartEvent::ItemAdded { product_id, .. }
            | CartEvent::QuantityUpdated { product_id, .. }
            | CartEvent::ItemRemoved { product_id, .. } => Some(product_id),
            CartEvent::Cleared { .. } => None,
        }
    }

    /// Toast shown to the shopper for this event, if any.
    ///
    /// Only adds are announced; quantity edits and removals happen on the
    /// cart page where the change is already visible.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            CartEvent::ItemAdded { name, .. } => Some(Notification {
                message: format!("{} added to cart", name),
                level: NotificationLevel::Success,
            }),
            _ => None,
        }
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A fire-and-forget message for the notification display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

/// Receives every change made through a [`CartStore`](crate::cart::CartStore).
///
/// Observers run after the change is applied and persisted. They cannot fail
/// or veto the change.
pub trait CartObserver {
    /// Called once per completed change with the state after the change.
    fn on_event(&mut self, event: &CartEvent, state: &CartState);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &CartState),
{
    fn on_event(&mut self, event: &CartEvent, state: &CartState) {
        self(event, state)
    }
}
