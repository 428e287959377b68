//! Rehydration and persistence behaviour of the cart store across restarts.

use newton_commerce::cart::{PersistedCart, RECORD_VERSION};
use newton_commerce::prelude::*;
use newton_cache::Cache;
use rust_decimal::Decimal;

const KEY: &str = "newtonbotics-cart";

fn product(id: &str, cents: i64, stock: u32) -> Product {
    Product::new(id, format!("Product {}", id), Decimal::new(cents, 2), stock)
        .with_category("robotics")
}

fn populated(backend: MemoryStore) -> CartStore {
    let mut store = CartStore::with_defaults(backend);
    store.add_item(product("servo", 1250, 20), 2);
    store.add_item(product("lidar", 9900, 3), 1);
    store.add_item(product("arduino", 2499, 8), 3);
    store.update_quantity("servo", 4);
    store
}

#[test]
fn restart_restores_identical_items() {
    let backend = MemoryStore::new();
    let original = populated(backend.clone());

    let restarted = CartStore::with_defaults(backend);
    assert_eq!(restarted.items(), original.items());

    let ids: Vec<&str> = restarted
        .items()
        .iter()
        .map(|i| i.product.id.as_str())
        .collect();
    assert_eq!(ids, vec!["servo", "lidar", "arduino"]);
    assert_eq!(restarted.totals(), original.totals());
}

#[test]
fn restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = CartStore::with_defaults(FileStore::open(dir.path()).unwrap());
        store.add_item(product("servo", 1250, 20), 2);
        store.add_item(product("lidar", 9900, 3), 1);
    }

    let reopened = CartStore::with_defaults(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.line_count(), 2);
    assert_eq!(reopened.item_count(), 3);
    assert_eq!(reopened.subtotal().display(), "$124.00");
    assert_eq!(
        reopened.items()[0].product.category.as_deref(),
        Some("robotics")
    );
}

#[test]
fn record_uses_state_and_version_envelope() {
    let backend = MemoryStore::new();
    populated(backend.clone());

    let raw = backend.get(KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(json["version"], 0);
    assert_eq!(json["state"]["items"][0]["product"]["id"], "servo");
    assert_eq!(json["state"]["items"][0]["quantity"], 4);
}

#[test]
fn corrupt_record_starts_empty() {
    let backend = MemoryStore::new();
    backend.set(KEY, b"{\"state\": {\"items\": [").unwrap();

    let mut store = CartStore::with_defaults(backend.clone());
    assert_eq!(store.item_count(), 0);

    // The next mutation overwrites the broken record.
    store.add_one(product("servo", 1250, 20));
    let restarted = CartStore::with_defaults(backend);
    assert_eq!(restarted.item_count(), 1);
}

#[test]
fn unknown_version_starts_empty() {
    let backend = MemoryStore::new();
    let mut state = CartState::new();
    state.apply(CartAction::Add {
        product: product("servo", 1250, 20),
        quantity: 1,
    });
    Cache::new(backend.clone())
        .set(
            KEY,
            &PersistedCart {
                state,
                version: RECORD_VERSION + 1,
            },
        )
        .unwrap();

    let store = CartStore::with_defaults(backend);
    assert!(store.items().is_empty());
}

#[test]
fn record_breaking_invariants_starts_empty() {
    let backend = MemoryStore::new();
    let record = serde_json::json!({
        "state": {
            "items": [
                { "product": { "id": "servo", "name": "Servo", "price": "12.50", "stock": 5 }, "quantity": 1 },
                { "product": { "id": "servo", "name": "Servo", "price": "12.50", "stock": 5 }, "quantity": 2 }
            ]
        },
        "version": 0
    });
    backend
        .set(KEY, &serde_json::to_vec(&record).unwrap())
        .unwrap();

    let store = CartStore::with_defaults(backend);
    assert_eq!(store.line_count(), 0);
}

#[test]
fn record_with_out_of_range_values_starts_empty() {
    let records = [
        serde_json::json!({ "id": "servo", "name": "Servo", "price": "100000000000", "stock": 5 }),
        serde_json::json!({ "id": "servo", "name": "Servo", "price": "-12.50", "stock": 5 }),
    ];
    let quantities = [i64::MAX, 1];

    for (product, quantity) in records.into_iter().zip(quantities) {
        let backend = MemoryStore::new();
        let record = serde_json::json!({
            "state": { "items": [ { "product": product, "quantity": quantity } ] },
            "version": 0
        });
        backend
            .set(KEY, &serde_json::to_vec(&record).unwrap())
            .unwrap();

        let store = CartStore::with_defaults(backend);
        assert_eq!(store.line_count(), 0);
        assert!(store.subtotal().is_zero());
        assert_eq!(store.grand_total().display(), "$5.99");
    }
}

#[test]
fn record_with_numeric_prices_is_accepted() {
    let backend = MemoryStore::new();
    let record = serde_json::json!({
        "state": {
            "items": [
                { "product": { "id": "servo", "name": "Servo", "price": 12.5, "stock": 5,
                               "originalPrice": 15, "rating": 4.5 }, "quantity": 2 }
            ]
        },
        "version": 0
    });
    backend
        .set(KEY, &serde_json::to_vec(&record).unwrap())
        .unwrap();

    let store = CartStore::with_defaults(backend);
    assert_eq!(store.subtotal().amount, Decimal::from(25));
    assert!(store.items()[0].product.is_on_sale());
}

#[test]
fn wiped_storage_starts_empty() {
    let backend = MemoryStore::new();
    populated(backend.clone());
    backend.wipe().unwrap();

    let store = CartStore::with_defaults(backend);
    assert_eq!(store.item_count(), 0);
}

#[test]
fn clear_is_persisted() {
    let backend = MemoryStore::new();
    let mut store = populated(backend.clone());
    store.clear_cart();

    let restarted = CartStore::with_defaults(backend);
    assert_eq!(restarted.item_count(), 0);
    assert!(restarted.subtotal().is_zero());
}

#[test]
fn two_stores_on_one_key_last_write_wins() {
    // Two tabs only reconcile with storage when they open.
    let backend = MemoryStore::new();
    let mut tab_a = CartStore::with_defaults(backend.clone());
    let mut tab_b = CartStore::with_defaults(backend.clone());

    tab_a.add_item(product("servo", 1250, 20), 2);
    tab_b.add_item(product("lidar", 9900, 3), 1);

    assert_eq!(tab_a.line_count(), 1);
    let reopened = CartStore::with_defaults(backend);
    assert_eq!(reopened.items(), tab_b.items());
}
