use crate::{
    db::{Peek, ToMany, ToOne},
    error::{ErrorClass, ErrorOrigin},
    obs::{metrics_report, metrics_reset_all},
    test_support::{
        Customer, Order, live_builders, live_queries, memory_store, seed_customer_with_orders,
    },
};

#[test]
fn to_one_peek_never_resolves() {
    let (store, _) = memory_store();
    let (customer, bananas, _) = seed_customer_with_orders(&store);
    metrics_reset_all();

    let mut order = store
        .boxed::<Order>()
        .unwrap()
        .get(bananas.id)
        .unwrap()
        .unwrap();
    assert_eq!(order.customer.target_id(), customer.id);
    assert!(matches!(order.customer.peek(), Peek::Unresolved));
    assert!(!order.customer.peek().is_resolved());
    assert_eq!(metrics_report().counters.ops.relation_resolves, 0);

    let resolved = order.customer.get().unwrap().map(|c| c.name.clone());
    assert_eq!(resolved.as_deref(), Some("Joe"));
    assert!(matches!(order.customer.peek(), Peek::Present(c) if c.id == customer.id));

    order.customer.get().unwrap();
    assert_eq!(metrics_report().counters.ops.relation_resolves, 1);
}

#[test]
fn to_one_caches_absent_outcome() {
    let (store, _) = memory_store();
    let orders = store.boxed::<Order>().unwrap();
    store.boxed::<Customer>().unwrap();
    metrics_reset_all();

    let mut dangling = Order {
        id: 0,
        customer: ToOne::with_target_id(42),
        text: "Pears".to_string(),
    };
    orders.put(&mut dangling).unwrap();

    assert!(dangling.customer.get().unwrap().is_none());
    assert!(matches!(dangling.customer.peek(), Peek::Absent));
    assert!(dangling.customer.get().unwrap().is_none());
    assert_eq!(metrics_report().counters.ops.relation_resolves, 1);
}

#[test]
fn to_one_zero_target_resolves_without_store() {
    let mut relation: ToOne<Customer> = ToOne::new();

    assert!(!relation.is_bound());
    assert!(relation.get().unwrap().is_none());
    assert!(matches!(relation.peek(), Peek::Absent));
}

#[test]
fn unbound_proxies_are_invalid_state() {
    let mut one: ToOne<Customer> = ToOne::with_target_id(7);
    let err = one.get().unwrap_err();
    assert_eq!(err.class, ErrorClass::InvalidState);
    assert_eq!(err.origin, ErrorOrigin::Relation);

    let mut many: ToMany<Order> = ToMany::with_owner(&Order::CUSTOMER_ID, 7);
    assert!(many.get().unwrap_err().is_invalid_state());
    assert!(many.peek().is_none());

    // An owner that was never put has nothing to resolve.
    let mut unsaved = Customer::new("Unsaved");
    assert!(unsaved.orders.get().unwrap().is_empty());
}

#[test]
fn to_one_local_edits() {
    let (store, _) = memory_store();
    let (joe, bananas, _) = seed_customer_with_orders(&store);
    let customers = store.boxed::<Customer>().unwrap();
    let mut ann = Customer::new("Ann");
    customers.put(&mut ann).unwrap();

    let mut order = bananas;
    assert_eq!(order.customer.target_id(), joe.id);

    order.customer.set(ann.clone()).unwrap();
    assert_eq!(order.customer.target_id(), ann.id);
    assert!(matches!(order.customer.peek(), Peek::Present(c) if c.name == "Ann"));

    order.customer.set_target_id(joe.id);
    assert!(matches!(order.customer.peek(), Peek::Unresolved));
    assert_eq!(order.customer.get().unwrap().map(|c| c.id), Some(joe.id));

    order.customer.clear();
    assert_eq!(order.customer.target_id(), 0);
    assert!(matches!(order.customer.peek(), Peek::Absent));

    let err = order.customer.set(Customer::new("Unsaved")).unwrap_err();
    assert_eq!(err.class, ErrorClass::InvalidArgument);
}

#[test]
fn to_one_reset_sees_changed_target() {
    let (store, _) = memory_store();
    let (customer, mut bananas, _) = seed_customer_with_orders(&store);
    let customers = store.boxed::<Customer>().unwrap();

    assert!(bananas.customer.get().unwrap().is_some());
    customers.remove(customer.id).unwrap();
    assert!(bananas.customer.get().unwrap().is_some());

    bananas.customer.reset();
    assert!(bananas.customer.get().unwrap().is_none());
}

#[test]
fn to_many_resolves_in_key_order_and_caches() {
    let (store, engine) = memory_store();
    let (customer, bananas, oranges) = seed_customer_with_orders(&store);
    metrics_reset_all();

    let mut customer = store
        .boxed::<Customer>()
        .unwrap()
        .get(customer.id)
        .unwrap()
        .unwrap();
    assert!(customer.orders.peek().is_none());

    let texts: Vec<&str> = customer
        .orders
        .get()
        .unwrap()
        .iter()
        .map(|o| o.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Bananas", "Oranges"]);

    let ids: Vec<u64> = customer.orders.peek().unwrap().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![bananas.id, oranges.id]);

    assert_eq!(customer.orders.len().unwrap(), 2);
    assert_eq!(metrics_report().counters.ops.relation_resolves, 1);
    assert_eq!(live_builders(&engine), 0);
    assert_eq!(live_queries(&engine), 0);
}

#[test]
fn to_many_reset_reflects_removal_and_foreign_key_changes() {
    let (store, _) = memory_store();
    let (mut customer, bananas, mut oranges) = seed_customer_with_orders(&store);
    let orders = store.boxed::<Order>().unwrap();

    assert_eq!(customer.orders.len().unwrap(), 2);

    orders.remove(bananas.id).unwrap();
    assert_eq!(customer.orders.len().unwrap(), 2);
    customer.orders.reset();
    assert_eq!(customer.orders.len().unwrap(), 1);

    oranges.customer.clear();
    orders.put(&mut oranges).unwrap();
    customer.orders.reset();
    assert_eq!(customer.orders.len().unwrap(), 0);
    assert!(customer.orders.is_empty().unwrap());
}

#[test]
fn attach_rebinds_detached_instances() {
    let (store, _) = memory_store();
    let (customer, _, _) = seed_customer_with_orders(&store);
    let customers = store.boxed::<Customer>().unwrap();

    let mut detached = Customer {
        id: customer.id,
        name: "stale".to_string(),
        orders: ToMany::with_owner(&Order::CUSTOMER_ID, customer.id),
    };
    assert!(!detached.orders.is_bound());
    assert!(detached.orders.len().unwrap_err().is_invalid_state());

    customers.attach(&mut detached);
    assert!(detached.orders.is_bound());
    assert_eq!(detached.orders.owner_id(), customer.id);
    assert_eq!(detached.orders.len().unwrap(), 2);
    assert_eq!(detached.name, "stale");
}

#[test]
fn resolving_does_not_write_the_owner() {
    let (store, _) = memory_store();
    let (customer, _, _) = seed_customer_with_orders(&store);
    let customers = store.boxed::<Customer>().unwrap();
    let before = store.engine().get("Customer", customer.id).unwrap();

    let mut loaded = customers.get(customer.id).unwrap().unwrap();
    loaded.orders.get().unwrap();

    assert_eq!(store.engine().get("Customer", customer.id).unwrap(), before);
}

#[test]
fn backlink_must_belong_to_target() {
    let (store, _) = memory_store();
    let (customer, _, _) = seed_customer_with_orders(&store);

    let mut wrong: ToMany<Order> = ToMany::new(&Customer::NAME);
    wrong.bind(&store, customer.id);

    assert_eq!(wrong.get().unwrap_err().class, ErrorClass::Internal);
}
