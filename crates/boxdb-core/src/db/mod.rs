pub mod config;
pub mod engine;
pub mod query;
pub mod record;
pub mod relation;
pub mod store;

pub use config::StoreConfig;
pub use engine::{BuilderHandle, Engine, MemoryEngine, QueryHandle};
pub use query::{
    Condition, ConditionOp, Operand, OrderDirective, OrderFlags, Query, QueryBuilder,
};
pub use record::{RawRow, Record};
pub use relation::{Peek, ToMany, ToOne};
pub use store::{EntityBox, Store};
