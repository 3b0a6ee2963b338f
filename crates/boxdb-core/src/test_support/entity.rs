use crate::{
    db::{Store, ToMany, ToOne, record::Record},
    error::InternalError,
    model::{EntityModel, Property, PropertyKind},
    traits::EntityKind,
    value::Value,
};

///
/// Customer
///

#[derive(Clone, Debug)]
pub(crate) struct Customer {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) orders: ToMany<Order>,
}

impl Customer {
    pub(crate) const ID: Property = Property::new("Customer", 1, "id", PropertyKind::Id);
    pub(crate) const NAME: Property = Property::new("Customer", 2, "name", PropertyKind::Text);

    pub(crate) fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            orders: ToMany::new(&ORDER_PROPERTIES[1]),
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
        let mut customer = Self::new("");
        customer.id = record.read_id(&Self::ID)?;
        customer.name = record.read_text(&Self::NAME)?.unwrap_or_default();

        Ok(customer)
    }

    fn bind(&mut self, store: &Store) {
        self.orders.bind(store, self.id);
    }
}

///
/// Order
///

#[derive(Clone, Debug)]
pub(crate) struct Order {
    pub(crate) id: u64,
    pub(crate) customer: ToOne<Customer>,
    pub(crate) text: String,
}

impl Order {
    pub(crate) const ID: Property = Property::new("Order", 1, "id", PropertyKind::Id);
    pub(crate) const CUSTOMER_ID: Property =
        Property::new("Order", 2, "customerId", PropertyKind::Id);
    pub(crate) const TEXT: Property = Property::new("Order", 3, "text", PropertyKind::Text);

    pub(crate) fn new(customer: &Customer, text: &str) -> Self {
        Self {
            id: 0,
            customer: ToOne::with_target_id(customer.id),
            text: text.to_string(),
        }
    }
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

///
/// Person
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Person {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) year_of_birth: Option<i64>,
    pub(crate) height: Option<f64>,
}

impl Person {
    pub(crate) const ID: Property = Property::new("Person", 1, "id", PropertyKind::Id);
    pub(crate) const NAME: Property = Property::new("Person", 2, "name", PropertyKind::Text);
    pub(crate) const YEAR_OF_BIRTH: Property =
        Property::new("Person", 3, "yearOfBirth", PropertyKind::Int);
    pub(crate) const HEIGHT: Property = Property::new("Person", 4, "height", PropertyKind::Float);

    pub(crate) fn new(name: &str, year_of_birth: Option<i64>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            year_of_birth,
            height: None,
        }
    }

    #[must_use]
    pub(crate) const fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

static PERSON_PROPERTIES: [Property; 4] = [
    Person::ID,
    Person::NAME,
    Person::YEAR_OF_BIRTH,
    Person::HEIGHT,
];
static PERSON_MODEL: EntityModel =
    EntityModel::new("Person", &PERSON_PROPERTIES[0], &PERSON_PROPERTIES);

impl EntityKind for Person {
    const MODEL: &'static EntityModel = &PERSON_MODEL;

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
            .with(&Self::YEAR_OF_BIRTH, self.year_of_birth)
            .with(&Self::HEIGHT, self.height)
    }

    fn from_record(record: &Record) -> Result<Self, InternalError> {
        Ok(Self {
            id: record.read_id(&Self::ID)?,
            name: record.read_text(&Self::NAME)?.unwrap_or_default(),
            year_of_birth: record.read_int(&Self::YEAR_OF_BIRTH)?,
            height: record.read_float(&Self::HEIGHT)?,
        })
    }
}
