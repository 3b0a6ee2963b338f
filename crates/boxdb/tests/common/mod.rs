#![allow(dead_code)]

use boxdb::{
    core::{
        db::{BuilderHandle, Condition, Engine, OrderDirective, QueryHandle, RawRow},
        error::InternalError,
    },
    prelude::*,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

//
// Entities
//

#[derive(Clone, Debug)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub orders: ToMany<Order>,
}

impl Customer {
    pub const ID: Property = Property::new("Customer", 1, "id", PropertyKind::Id);
    pub const NAME: Property = Property::new("Customer", 2, "name", PropertyKind::Text);

    pub fn new(name: &str) -> Self {
        Self::with_id(0, name)
    }

    /// Detached instance for a known id, as a caller would build by hand.
    pub fn with_id(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            orders: ToMany::with_owner(&Order::CUSTOMER_ID, id),
        }
    }
}

static CUSTOMER_PROPERTIES: [Property; 2] = [Customer::ID, Customer::NAME];
static CUSTOMER_MODEL: EntityModel =
    EntityModel::new("Customer", &CUSTOMER_PROPERTIES[0], &CUSTOMER_PROPERTIES);

impl EntityKind for Customer {
    const MODEL: &'static EntityModel = &CUSTOMER_MODEL;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with(&Self::ID, Value::from_id(self.id))
            .with(&Self::NAME, self.name.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, InternalError> {
        Ok(Self::with_id(
            record.read_id(&Self::ID)?,
            &record.read_text(&Self::NAME)?.unwrap_or_default(),
        ))
    }

    fn bind(&mut self, store: &Store) {
        self.orders.bind(store, self.id);
    }
}

#[derive(Clone, Debug)]
pub struct Order {
    pub id: u64,
    pub customer: ToOne<Customer>,
    pub text: String,
}

impl Order {
    pub const ID: Property = Property::new("Order", 1, "id", PropertyKind::Id);
    pub const CUSTOMER_ID: Property = Property::new("Order", 2, "customerId", PropertyKind::Id);
    pub const TEXT: Property = Property::new("Order", 3, "text", PropertyKind::Text);
}

static ORDER_PROPERTIES: [Property; 3] = [Order::ID, Order::CUSTOMER_ID, Order::TEXT];
static ORDER_MODEL: EntityModel =
    EntityModel::new("Order", &ORDER_PROPERTIES[0], &ORDER_PROPERTIES);

impl EntityKind for Order {
    const MODEL: &'static EntityModel = &ORDER_MODEL;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with(&Self::ID, Value::from_id(self.id))
            .with(&Self::CUSTOMER_ID, self.customer.to_value())
            .with(&Self::TEXT, self.text.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, InternalError> {
        Ok(Self {
            id: record.read_id(&Self::ID)?,
            customer: ToOne::with_target_id(record.read_id(&Self::CUSTOMER_ID)?),
            text: record.read_text(&Self::TEXT)?.unwrap_or_default(),
        })
    }

    fn bind(&mut self, store: &Store) {
        self.customer.bind(store);
    }
}

//
// Fixture
//

pub struct Fixture {
    pub store: Store,
    pub engine: Arc<CountingEngine>,
    pub customers: EntityBox<Customer>,
    pub orders: EntityBox<Order>,
}

impl Fixture {
    pub fn new() -> Self {
        let engine = Arc::new(CountingEngine::default());
        let store = Store::open(engine.clone(), StoreConfig::new().debug());

        Self {
            customers: store.boxed().expect("customer box"),
            orders: store.boxed().expect("order box"),
            store,
            engine,
        }
    }

    pub fn put_customer(&self) -> Customer {
        let mut customer = Customer::new("Joe");
        self.customers.put(&mut customer).expect("put customer");

        customer
    }

    pub fn put_order(&self, customer: &Customer, text: &str) -> Order {
        let mut order = Order {
            id: 0,
            customer: ToOne::with_target_id(customer.id),
            text: text.to_string(),
        };
        self.orders.put(&mut order).expect("put order");

        order
    }
}

//
// CountingEngine
//

/// `MemoryEngine` wrapper that counts point lookups and query executions.
#[derive(Default)]
pub struct CountingEngine {
    inner: MemoryEngine,
    gets: AtomicUsize,
    finds: AtomicUsize,
}

impl CountingEngine {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn live_builders(&self) -> usize {
        self.inner.live_builders().expect("live builders")
    }

    pub fn live_queries(&self) -> usize {
        self.inner.live_queries().expect("live queries")
    }
}

impl Engine for CountingEngine {
    fn register_entity(&self, model: &'static EntityModel) -> Result<(), InternalError> {
        self.inner.register_entity(model)
    }

    fn create_builder(&self, entity_name: &str) -> Result<BuilderHandle, InternalError> {
        self.inner.create_builder(entity_name)
    }

    fn destroy_builder(&self, handle: BuilderHandle) -> Result<(), InternalError> {
        self.inner.destroy_builder(handle)
    }

    fn append_condition(
        &self,
        handle: BuilderHandle,
        condition: Condition,
    ) -> Result<(), InternalError> {
        self.inner.append_condition(handle, condition)
    }

    fn append_order(
        &self,
        handle: BuilderHandle,
        order: OrderDirective,
    ) -> Result<(), InternalError> {
        self.inner.append_order(handle, order)
    }

    fn build_query(&self, handle: BuilderHandle) -> Result<QueryHandle, InternalError> {
        self.inner.build_query(handle)
    }

    fn destroy_query(&self, handle: QueryHandle) -> Result<(), InternalError> {
        self.inner.destroy_query(handle)
    }

    fn find(&self, handle: QueryHandle) -> Result<Vec<RawRow>, InternalError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(handle)
    }

    fn find_first(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_first(handle)
    }

    fn find_unique(&self, handle: QueryHandle) -> Result<Option<RawRow>, InternalError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_unique(handle)
    }

    fn find_ids(&self, handle: QueryHandle) -> Result<Vec<u64>, InternalError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_ids(handle)
    }

    fn count(&self, handle: QueryHandle) -> Result<u64, InternalError> {
        self.inner.count(handle)
    }

    fn remove_matching(&self, handle: QueryHandle) -> Result<u64, InternalError> {
        self.inner.remove_matching(handle)
    }

    fn describe(&self, handle: QueryHandle) -> Result<String, InternalError> {
        self.inner.describe(handle)
    }

    fn put(&self, entity_name: &str, id: u64, row: RawRow) -> Result<u64, InternalError> {
        self.inner.put(entity_name, id, row)
    }

    fn get(&self, entity_name: &str, id: u64) -> Result<Option<RawRow>, InternalError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(entity_name, id)
    }

    fn get_all(&self, entity_name: &str) -> Result<Vec<RawRow>, InternalError> {
        self.inner.get_all(entity_name)
    }

    fn remove(&self, entity_name: &str, id: u64) -> Result<bool, InternalError> {
        self.inner.remove(entity_name, id)
    }

    fn count_all(&self, entity_name: &str) -> Result<u64, InternalError> {
        self.inner.count_all(entity_name)
    }
}
