pub(crate) mod entity;

pub(crate) use entity::{Customer, Order, Person};

use crate::db::{MemoryEngine, Store, StoreConfig};
use std::sync::Arc;

/// Fresh in-memory store plus a handle on its engine for resource checks.
pub(crate) fn memory_store() -> (Store, Arc<MemoryEngine>) {
    let engine = Arc::new(MemoryEngine::new());
    let store = Store::open(engine.clone(), StoreConfig::new());

    (store, engine)
}

/// Builder resources still live on the engine.
pub(crate) fn live_builders(engine: &MemoryEngine) -> usize {
    engine.live_builders().expect("live builders")
}

/// Query resources still live on the engine.
pub(crate) fn live_queries(engine: &MemoryEngine) -> usize {
    engine.live_queries().expect("live queries")
}

/// Customer 1 with orders "Bananas" and "Oranges".
pub(crate) fn seed_customer_with_orders(store: &Store) -> (Customer, Order, Order) {
    let customers = store.boxed::<Customer>().expect("customer box");
    let orders = store.boxed::<Order>().expect("order box");

    let mut customer = Customer::new("Joe");
    customers.put(&mut customer).expect("put customer");

    let mut bananas = Order::new(&customer, "Bananas");
    let mut oranges = Order::new(&customer, "Oranges");
    orders.put(&mut bananas).expect("put bananas");
    orders.put(&mut oranges).expect("put oranges");

    (customer, bananas, oranges)
}
